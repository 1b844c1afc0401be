//! WMO weather code table.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::Serialize;

/// A display glyph and label for one WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCondition {
    pub code: i32,
    pub glyph: &'static str,
    pub label: &'static str,
}

const fn cond(code: i32, glyph: &'static str, label: &'static str) -> WeatherCondition {
    WeatherCondition { code, glyph, label }
}

/// Sorted by code.
static WMO_TABLE: [WeatherCondition; 24] = [
    cond(0, "☀️", "Clear"),
    cond(1, "🌤️", "Mainly Clear"),
    cond(2, "⛅", "Partly Cloudy"),
    cond(3, "☁️", "Overcast"),
    cond(45, "🌫️", "Foggy"),
    cond(48, "🌫️", "Depositing Rime Fog"),
    cond(51, "🌧️", "Light Drizzle"),
    cond(53, "🌧️", "Moderate Drizzle"),
    cond(55, "🌧️", "Dense Drizzle"),
    cond(61, "🌧️", "Slight Rain"),
    cond(63, "🌧️", "Moderate Rain"),
    cond(65, "⛈️", "Heavy Rain"),
    cond(71, "❄️", "Slight Snow"),
    cond(73, "❄️", "Moderate Snow"),
    cond(75, "❄️", "Heavy Snow"),
    cond(77, "❄️", "Snow Grains"),
    cond(80, "🌧️", "Slight Showers"),
    cond(81, "🌧️", "Moderate Showers"),
    cond(82, "⛈️", "Violent Showers"),
    cond(85, "❄️", "Slight Snow Showers"),
    cond(86, "❄️", "Heavy Snow Showers"),
    cond(95, "⛈️", "Thunderstorm"),
    cond(96, "⛈️", "Thunderstorm with Hail"),
    cond(99, "⛈️", "Thunderstorm with Large Hail"),
];

/// Look up the condition for a WMO code. Codes outside the table return `None`.
pub fn lookup(code: i32) -> Option<&'static WeatherCondition> {
    WMO_TABLE
        .binary_search_by_key(&code, |c| c.code)
        .ok()
        .map(|idx| &WMO_TABLE[idx])
}

/// The condition shown when no data is available.
pub fn clear() -> &'static WeatherCondition {
    &WMO_TABLE[0]
}

/// All known conditions, ordered by code.
pub fn all() -> &'static [WeatherCondition] {
    &WMO_TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [i32; 24] = [
        0, 1, 2, 3, 45, 48, 51, 53, 55, 61, 63, 65, 71, 73, 75, 77, 80, 81, 82, 85, 86, 95, 96, 99,
    ];

    #[test]
    fn every_known_code_has_glyph_and_label() {
        for code in KNOWN {
            let c = lookup(code).unwrap_or_else(|| panic!("code {code} missing"));
            assert_eq!(c.code, code);
            assert!(!c.glyph.is_empty());
            assert!(!c.label.is_empty());
        }
    }

    #[test]
    fn table_is_sorted_for_binary_search() {
        assert!(all().windows(2).all(|w| w[0].code < w[1].code));
    }

    #[test]
    fn unknown_codes_are_not_found() {
        for code in [-1, 4, 56, 66, 100, 999] {
            assert!(lookup(code).is_none(), "code {code} should be unknown");
        }
    }

    #[test]
    fn clear_is_code_zero() {
        assert_eq!(clear().label, "Clear");
        assert_eq!(clear().glyph, "☀️");
        assert_eq!(lookup(3).map(|c| c.label), Some("Overcast"));
    }
}
