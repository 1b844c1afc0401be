//! Current conditions and daily forecast from Open-Meteo.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    Config,
    error::{Error, Result, truncate_body},
    geocode::Coordinate,
};

const SERVICE: &str = "Open-Meteo";

pub const DAILY_FIELDS: &str = "weather_code,temperature_2m_min,temperature_2m_max";
pub const CURRENT_FIELDS: &str =
    "temperature_2m,weather_code,rain,wind_speed_10m,relative_humidity_2m,precipitation,is_day";

/// Forecast body as returned by the weather service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    pub current: RawCurrent,
    #[serde(default)]
    pub current_units: RawCurrentUnits,
    #[serde(default)]
    pub daily: RawDaily,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCurrent {
    pub temperature_2m: f64,
    pub weather_code: Option<i32>,
    pub rain: f64,
    pub wind_speed_10m: f64,
    pub relative_humidity_2m: f64,
    pub precipitation: Option<f64>,
    pub is_day: Option<u8>,
}

/// Units keyed like the matching `current` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCurrentUnits {
    pub temperature_2m: String,
    pub rain: String,
    pub wind_speed_10m: String,
    pub relative_humidity_2m: String,
}

/// Parallel arrays, one element per forecast day. Temperatures stay in the
/// number form the service sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDaily {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<i32>>,
    pub temperature_2m_min: Vec<Option<Number>>,
    pub temperature_2m_max: Vec<Option<Number>>,
}

/// Result of a forecast request that reached the service.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Ready(RawForecast),
    /// The service answered with an `error` field.
    ServiceError { reason: String },
}

#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(&self, coordinate: &Coordinate) -> Result<FetchOutcome>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        Self::new(http, config.forecast_url.clone())
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn fetch_forecast(&self, coordinate: &Coordinate) -> Result<FetchOutcome> {
        let url = format!("{}/v1/forecast", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", coordinate.latitude.as_str()),
                ("longitude", coordinate.longitude.as_str()),
                ("daily", DAILY_FIELDS),
                ("current", CURRENT_FIELDS),
            ])
            .send()
            .await
            .map_err(|source| Error::Transport { service: SERVICE, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| Error::Transport { service: SERVICE, source })?;

        let value = serde_json::from_str::<serde_json::Value>(&body);

        if let Some(reason) = value.as_ref().ok().and_then(service_error) {
            warn!(
                "{} reported an error for ({}, {}): {}",
                SERVICE, coordinate.latitude, coordinate.longitude, reason
            );
            return Ok(FetchOutcome::ServiceError { reason });
        }

        if !status.is_success() {
            return Err(Error::Status { service: SERVICE, status, body: truncate_body(&body) });
        }

        let raw = value
            .and_then(serde_json::from_value::<RawForecast>)
            .map_err(|source| Error::Decode { service: SERVICE, source })?;

        debug!(
            "Fetched forecast for ({}, {}) with {} days",
            coordinate.latitude,
            coordinate.longitude,
            raw.daily.time.len()
        );
        Ok(FetchOutcome::Ready(raw))
    }
}

/// The reason carried by a top-level `error` field, if one is set.
fn service_error(body: &serde_json::Value) -> Option<String> {
    match body.get("error")? {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        err => {
            let reason = body
                .get("reason")
                .and_then(|r| r.as_str())
                .map(str::to_owned)
                .or_else(|| err.as_str().map(str::to_owned))
                .unwrap_or_else(|| "unknown error".to_string());
            Some(reason)
        }
    }
}
