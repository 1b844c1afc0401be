//! Core library for the `skycast` weather widget.
//!
//! This crate defines:
//! - The WMO weather code table
//! - Location lookup (Nominatim) and forecast retrieval (Open-Meteo)
//! - Shaping of forecast responses into a fixed display model
//! - Rendering into named output slots, driven by a view controller
//! - Configuration handling
//!
//! It is used by `skycast-cli`, but any [`RenderTarget`] can be driven by it.

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod model;
pub mod shape;
pub mod view;
pub mod wmo;

pub use config::{Config, RenderPolicy};
pub use controller::{ControllerState, SearchReport, ViewController};
pub use error::Error;
pub use forecast::{FetchOutcome, ForecastSource, OpenMeteoClient, RawForecast};
pub use geocode::{Coordinate, Geocoder, NominatimGeocoder};
pub use model::{ConditionCell, CurrentConditions, DailyForecastEntry, ForecastView};
pub use shape::{shape, shape_raw};
pub use view::{ForecastRow, MemoryTarget, RenderTarget, RenderedView, render, with_target};
pub use wmo::WeatherCondition;
