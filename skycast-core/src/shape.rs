//! Normalizes forecast responses into the display model.

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    forecast::{FetchOutcome, RawForecast},
    model::{ConditionCell, CurrentConditions, DailyForecastEntry, ForecastView},
};

/// Shape a fetch outcome. Service errors produce the placeholder view.
pub fn shape(outcome: &FetchOutcome) -> ForecastView {
    match outcome {
        FetchOutcome::Ready(raw) => shape_raw(raw),
        FetchOutcome::ServiceError { .. } => ForecastView::placeholder(),
    }
}

pub fn shape_raw(raw: &RawForecast) -> ForecastView {
    let current = &raw.current;
    let units = &raw.current_units;

    let current = CurrentConditions {
        temperature: with_unit(current.temperature_2m, &units.temperature_2m),
        rainfall: with_unit(current.rain, &units.rain),
        humidity: with_unit(current.relative_humidity_2m, &units.relative_humidity_2m),
        wind_speed: with_unit(current.wind_speed_10m, &units.wind_speed_10m),
        condition: ConditionCell::from_code(current.weather_code),
    };

    let daily = &raw.daily;
    let daily = daily
        .time
        .iter()
        .enumerate()
        .map(|(idx, date)| DailyForecastEntry {
            day_label: weekday_label(date),
            condition: ConditionCell::from_code(daily.weather_code.get(idx).copied().flatten()),
            min_temp: daily.temperature_2m_min.get(idx).cloned().flatten(),
            max_temp: daily.temperature_2m_max.get(idx).cloned().flatten(),
        })
        .collect();

    ForecastView { current, daily }
}

fn with_unit(value: f64, unit: &str) -> String {
    format!("{value} {unit}")
}

/// English short weekday of an ISO date; unparseable dates are kept as-is.
fn weekday_label(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%a").to_string(),
        Err(e) => {
            debug!("Unparseable forecast date '{}': {}", date, e);
            date.to_string()
        }
    }
}
