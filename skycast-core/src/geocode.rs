//! Forward geocoding: free-text place name to coordinates.
//! Uses Nominatim (OpenStreetMap).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

use crate::{
    Config,
    error::{Error, Result, truncate_body},
};

const SERVICE: &str = "Nominatim";

/// A latitude/longitude pair, kept as the geocoder reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinate {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self { latitude: latitude.into(), longitude: longitude.into() }
    }

    /// Location used when a query has no match.
    pub fn fallback() -> Self {
        Self::new("27", "85")
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve a query to a coordinate. A query without matches resolves to a
    /// fallback coordinate; only transport failures are errors.
    async fn resolve(&self, query: &str) -> Result<Coordinate>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
    fallback: Coordinate,
}

impl NominatimGeocoder {
    pub fn new(http: Client, base_url: impl Into<String>, fallback: Coordinate) -> Self {
        Self { http, base_url: base_url.into(), fallback }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        Self::new(http, config.geocoding_url.clone(), config.fallback.clone())
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, query: &str) -> Result<Coordinate> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Blank query, using fallback coordinate");
            return Ok(self.fallback.clone());
        }

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|source| Error::Transport { service: SERVICE, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| Error::Transport { service: SERVICE, source })?;

        if !status.is_success() {
            return Err(Error::Status { service: SERVICE, status, body: truncate_body(&body) });
        }

        let places: Vec<NominatimPlace> = serde_json::from_str(&body)
            .map_err(|source| Error::Decode { service: SERVICE, source })?;

        match places.into_iter().next() {
            Some(place) => {
                debug!("Geocoded '{}' to ({}, {})", query, place.lat, place.lon);
                Ok(Coordinate::new(place.lat, place.lon))
            }
            None => {
                debug!("No match for '{}', using fallback coordinate", query);
                Ok(self.fallback.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn geocoder(server: &MockServer) -> NominatimGeocoder {
        NominatimGeocoder::new(Client::new(), server.uri(), Coordinate::fallback())
    }

    #[tokio::test]
    async fn first_match_is_returned_as_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Sydney"))
            .and(query_param("format", "json"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "-33.8698439", "lon": "151.2082848", "display_name": "Sydney" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let coord = geocoder(&server).resolve("Sydney").await.unwrap();
        assert_eq!(coord, Coordinate::new("-33.8698439", "151.2082848"));
    }

    #[tokio::test]
    async fn no_match_resolves_to_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let coord = geocoder(&server).resolve("Nowhere at all").await.unwrap();
        assert_eq!(coord, Coordinate::new("27", "85"));
    }

    #[tokio::test]
    async fn blank_query_skips_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let coord = geocoder(&server).resolve("   ").await.unwrap();
        assert_eq!(coord, Coordinate::fallback());
    }

    #[tokio::test]
    async fn configured_fallback_is_used() {
        let server = MockServer::start().await;
        let g = NominatimGeocoder::new(Client::new(), server.uri(), Coordinate::new("1.5", "2.5"));

        let coord = g.resolve("").await.unwrap();
        assert_eq!(coord, Coordinate::new("1.5", "2.5"));
    }

    #[tokio::test]
    async fn server_error_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let err = geocoder(&server).resolve("Sydney").await.unwrap_err();
        assert!(matches!(err, Error::Status { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = geocoder(&server).resolve("Sydney").await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
