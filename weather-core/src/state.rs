//! Presenter: turns user actions into fetches and publishes a `UiState`.
//!
//! Every search sets `Loading` immediately and spawns its own task. Tasks are
//! never cancelled; whichever finishes last owns the cell, so an older
//! request completing late overwrites a newer result.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    DisplayWeather, FetchError, LocationQuery,
    provider::WeatherFetcher,
    store::{KeyValueStore, LastSearch},
    transform::to_display,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }
}

pub const BLANK_CITY_MESSAGE: &str = "City name must not be empty";

/// `None` until the first search starts.
pub type WeatherCell = Option<UiState<DisplayWeather>>;

#[derive(Debug, Clone)]
pub struct WeatherPresenter {
    fetcher: Arc<dyn WeatherFetcher>,
    store: Arc<dyn KeyValueStore>,
    cell: Arc<watch::Sender<WeatherCell>>,
}

impl WeatherPresenter {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>, store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { fetcher, store, cell: Arc::new(tx) }
    }

    pub fn state(&self) -> WeatherCell {
        self.cell.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherCell> {
        self.cell.subscribe()
    }

    pub fn last_search(&self) -> Option<LastSearch> {
        LastSearch::load(self.store.as_ref())
    }

    /// Search by `"city,state,country"`; remembers the search on success.
    ///
    /// A blank city fails immediately without contacting the provider.
    /// Must be called inside a tokio runtime.
    pub fn search_by_name(&self, city: &str, state: Option<&str>, country: &str) -> JoinHandle<()> {
        let city = city.trim();
        if city.is_empty() {
            return self.fail_fast(BLANK_CITY_MESSAGE.to_string());
        }

        let query = LocationQuery::from_parts(city, state, country);
        let remember = LastSearch {
            city: city.to_string(),
            state: state.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
        };
        self.spawn_fetch(query, Some(remember))
    }

    /// Search by coordinates. Non-finite or out-of-range values mean the
    /// device produced no usable location.
    pub fn search_by_location(&self, lat: f64, lon: f64) -> JoinHandle<()> {
        let valid = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
        if !valid {
            return self.fail_fast(FetchError::LocationUnavailable.user_message());
        }
        self.spawn_fetch(LocationQuery::Coordinates { lat, lon }, None)
    }

    /// Re-run the persisted last search, if there is one.
    pub fn restore_last_search(&self, country: &str) -> Option<JoinHandle<()>> {
        let last = self.last_search()?;
        info!(city = %last.city, state = ?last.state, "reloading last search");
        Some(self.search_by_name(&last.city, last.state.as_deref(), country))
    }

    fn fail_fast(&self, message: String) -> JoinHandle<()> {
        warn!(reason = %message, "search rejected before fetching");
        self.cell.send_replace(Some(UiState::Error(message)));
        tokio::spawn(async {})
    }

    fn spawn_fetch(&self, query: LocationQuery, remember: Option<LastSearch>) -> JoinHandle<()> {
        self.cell.send_if_modified(|cell| {
            if matches!(cell, Some(UiState::Loading)) {
                debug!(%query, "search started while another is in flight");
                false
            } else {
                *cell = Some(UiState::Loading);
                true
            }
        });

        let this = self.clone();
        tokio::spawn(async move { this.run_fetch(query, remember).await })
    }

    async fn run_fetch(&self, query: LocationQuery, remember: Option<LastSearch>) {
        match self.fetcher.fetch(&query).await {
            Ok(raw) => {
                let weather = to_display(&raw);
                debug!(%query, city = %weather.city_name, "weather loaded");
                self.cell.send_replace(Some(UiState::Success(weather)));

                if let Some(last) = remember {
                    self.persist_last_search(last).await;
                }
            }
            Err(err) => {
                warn!(%query, error = %err, "weather fetch failed");
                self.cell.send_replace(Some(UiState::Error(err.user_message())));
            }
        }
    }

    // Store writes are blocking file I/O; keep them off the async workers.
    async fn persist_last_search(&self, last: LastSearch) {
        let store = Arc::clone(&self.store);
        match tokio::task::spawn_blocking(move || last.save(store.as_ref())).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "failed to persist last search"),
            Err(err) => warn!(error = %err, "last search writer panicked"),
        }
    }
}
