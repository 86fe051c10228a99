//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The OpenWeather current-weather fetcher and its typed errors
//! - The pure transformation from provider payload to display record
//! - A presenter publishing loading / success / error state
//! - Configuration and the persisted last-search record
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod state;
pub mod store;
pub mod transform;

pub use config::Config;
pub use error::FetchError;
pub use model::{DisplayWeather, LocationQuery, RawWeatherResponse};
pub use provider::{ProviderSettings, WeatherFetcher, fetcher_from_config};
pub use state::{UiState, WeatherPresenter};
pub use store::{FileStore, KeyValueStore, LastSearch, MemoryStore};
pub use transform::to_display;
