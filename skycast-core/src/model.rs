use serde::Serialize;
use serde_json::Number;

use crate::wmo::WeatherCondition;

/// Text shown in every current-conditions slot when there is no data.
pub const PLACEHOLDER_METRIC: &str = "- -";

/// What a condition slot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCell {
    Known(WeatherCondition),
    /// The code was missing or not in the table; renders blank.
    Unknown,
    /// No forecast data at all; renders `-`.
    Placeholder,
}

impl ConditionCell {
    pub fn from_code(code: Option<i32>) -> Self {
        code.and_then(crate::wmo::lookup)
            .map_or(Self::Unknown, |c| Self::Known(*c))
    }

    pub fn condition(&self) -> Option<&WeatherCondition> {
        match self {
            Self::Known(c) => Some(c),
            Self::Unknown | Self::Placeholder => None,
        }
    }
}

/// Current conditions, each metric already formatted as `"<value> <unit>"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: String,
    pub rainfall: String,
    pub humidity: String,
    pub wind_speed: String,
    pub condition: ConditionCell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecastEntry {
    /// Short weekday name, e.g. "Mon".
    pub day_label: String,
    pub condition: ConditionCell,
    /// As sent by the service.
    pub min_temp: Option<Number>,
    pub max_temp: Option<Number>,
}

/// Everything the widget displays for one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub current: CurrentConditions,
    /// Chronological.
    pub daily: Vec<DailyForecastEntry>,
}

impl ForecastView {
    /// The uniform view shown when no forecast is available.
    pub fn placeholder() -> Self {
        Self {
            current: CurrentConditions {
                temperature: PLACEHOLDER_METRIC.to_string(),
                rainfall: PLACEHOLDER_METRIC.to_string(),
                humidity: PLACEHOLDER_METRIC.to_string(),
                wind_speed: PLACEHOLDER_METRIC.to_string(),
                condition: ConditionCell::Known(*crate::wmo::clear()),
            },
            daily: vec![DailyForecastEntry {
                day_label: " ".to_string(),
                condition: ConditionCell::Placeholder,
                min_temp: None,
                max_temp: None,
            }],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}
