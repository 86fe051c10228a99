use crate::{
    Config, FetchError, LocationQuery, RawWeatherResponse,
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Connection settings for the weather provider. Always passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
}

/// Single-shot current-weather lookups. No retries, transport-default timeout.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch_by_name(&self, query: &str) -> Result<RawWeatherResponse, FetchError>;

    async fn fetch_by_location(&self, lat: f64, lon: f64)
    -> Result<RawWeatherResponse, FetchError>;

    async fn fetch(&self, query: &LocationQuery) -> Result<RawWeatherResponse, FetchError> {
        match query {
            LocationQuery::Text(q) => self.fetch_by_name(q).await,
            LocationQuery::Coordinates { lat, lon } => self.fetch_by_location(*lat, *lon).await,
        }
    }
}

/// Construct the OpenWeather fetcher from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherFetcher>> {
    let settings = config.provider_settings()?;
    Ok(Arc::new(OpenWeatherClient::new(settings)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct Recording {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WeatherFetcher for Recording {
        async fn fetch_by_name(&self, query: &str) -> Result<RawWeatherResponse, FetchError> {
            self.calls.lock().push(format!("name:{query}"));
            Err(FetchError::decode("unused"))
        }

        async fn fetch_by_location(
            &self,
            lat: f64,
            lon: f64,
        ) -> Result<RawWeatherResponse, FetchError> {
            self.calls.lock().push(format!("loc:{lat}:{lon}"));
            Err(FetchError::decode("unused"))
        }
    }

    #[tokio::test]
    async fn fetch_dispatches_on_query_form() {
        let fetcher = Recording::default();

        let _ = fetcher.fetch(&LocationQuery::Text("Plano,US".into())).await;
        let _ = fetcher.fetch(&LocationQuery::Coordinates { lat: 1.5, lon: -2.0 }).await;

        assert_eq!(*fetcher.calls.lock(), vec!["name:Plano,US", "loc:1.5:-2"]);
    }

    #[test]
    fn fetcher_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = fetcher_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn fetcher_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        assert!(fetcher_from_config(&cfg).is_ok());
    }
}
