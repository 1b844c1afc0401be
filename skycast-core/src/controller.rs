//! Search pipeline: resolve, fetch, shape, render.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    config::{Config, RenderPolicy},
    forecast::{ForecastSource, OpenMeteoClient},
    geocode::{Geocoder, NominatimGeocoder},
    model::ForecastView,
    shape::shape,
    view::{RenderTarget, render, with_target},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Loading,
}

/// What happened to one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    /// Position of this search among all searches started by the controller.
    pub sequence: u64,
    /// Whether the result was painted to the target.
    pub applied: bool,
    pub view: ForecastView,
}

/// Drives searches and owns all writes to the render target.
///
/// Searches are independent: nothing is queued, debounced or cancelled. With
/// [`RenderPolicy::LatestRequest`] a finished search only paints if no newer
/// search was started in the meantime; with [`RenderPolicy::LastCompleted`]
/// every search paints and the last one to finish wins.
pub struct ViewController<T> {
    geocoder: Box<dyn Geocoder>,
    source: Box<dyn ForecastSource>,
    target: Arc<Mutex<T>>,
    policy: RenderPolicy,
    issued: AtomicU64,
    loading: AtomicBool,
}

impl<T: RenderTarget + 'static> ViewController<T> {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        source: Box<dyn ForecastSource>,
        target: Arc<Mutex<T>>,
        policy: RenderPolicy,
    ) -> Self {
        Self {
            geocoder,
            source,
            target,
            policy,
            issued: AtomicU64::new(0),
            loading: AtomicBool::new(false),
        }
    }

    /// Wire up Nominatim and Open-Meteo as configured.
    pub fn from_config(config: &Config, target: Arc<Mutex<T>>) -> anyhow::Result<Self> {
        let http = config.http_client()?;
        Ok(Self::new(
            Box::new(NominatimGeocoder::from_config(config, http.clone())),
            Box::new(OpenMeteoClient::from_config(config, http)),
            target,
            config.render_policy,
        ))
    }

    pub fn target(&self) -> &Arc<Mutex<T>> {
        &self.target
    }

    pub fn state(&self) -> ControllerState {
        if self.loading.load(Ordering::SeqCst) {
            ControllerState::Loading
        } else {
            ControllerState::Idle
        }
    }

    /// Run the initial search.
    pub async fn start(&self, query: &str) -> SearchReport {
        self.search(query).await
    }

    /// Put `query` in the search box and run the search to completion.
    pub async fn search(&self, query: &str) -> SearchReport {
        let sequence = self.begin(query);
        self.finish(sequence, query).await
    }

    /// Run a search in the background. The search counts as started when this
    /// returns, so a later call is always the newer request.
    pub fn spawn_search(self: &Arc<Self>, query: impl Into<String>) -> JoinHandle<SearchReport> {
        let query = query.into();
        let sequence = self.begin(&query);
        let this = Arc::clone(self);
        tokio::spawn(async move { this.finish(sequence, &query).await })
    }

    /// Sequence numbers and the loading flag only change while the target is
    /// locked, so they always agree with the busy slot.
    fn begin(&self, query: &str) -> u64 {
        with_target(&self.target, |t| {
            let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            self.loading.store(true, Ordering::SeqCst);
            t.set_query(query);
            t.set_busy(true);
            sequence
        })
    }

    async fn finish(&self, sequence: u64, query: &str) -> SearchReport {
        debug!("Search #{} for '{}'", sequence, query);
        let view = self.pipeline(query).await;
        let rendered = render(&view);

        let applied = with_target(&self.target, |t| {
            let current = match self.policy {
                RenderPolicy::LatestRequest => self.issued.load(Ordering::SeqCst) == sequence,
                RenderPolicy::LastCompleted => true,
            };
            if current {
                t.paint(&rendered);
                t.set_busy(false);
                self.loading.store(false, Ordering::SeqCst);
            }
            current
        });

        if applied {
            info!("Rendered search #{} for '{}'", sequence, query);
        } else {
            debug!("Dropping stale search #{} for '{}'", sequence, query);
        }

        SearchReport { sequence, applied, view }
    }

    /// Any failure along the way ends in the placeholder view.
    async fn pipeline(&self, query: &str) -> ForecastView {
        let coordinate = match self.geocoder.resolve(query).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Location lookup for '{}' failed: {}", query, e);
                return ForecastView::placeholder();
            }
        };

        match self.source.fetch_forecast(&coordinate).await {
            Ok(outcome) => shape(&outcome),
            Err(e) => {
                warn!(
                    "Forecast for ({}, {}) failed: {}",
                    coordinate.latitude, coordinate.longitude, e
                );
                ForecastView::placeholder()
            }
        }
    }
}
