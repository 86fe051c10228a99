use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::{
    FetchError, LocationQuery, RawWeatherResponse,
    model::StatusEnvelope,
    provider::{ProviderSettings, WeatherFetcher},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    settings: ProviderSettings,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(settings: ProviderSettings) -> Self {
        Self { settings, http: Client::new() }
    }

    fn endpoint(&self) -> String {
        format!("{}/data/2.5/weather", self.settings.base_url.trim_end_matches('/'))
    }

    async fn fetch_current(&self, query: &LocationQuery) -> Result<RawWeatherResponse, FetchError> {
        let mut params = query.query_pairs();
        params.push(("appid", self.settings.api_key.clone()));

        debug!(%query, "requesting current weather");

        let res = self.http.get(self.endpoint()).query(&params).send().await.map_err(|err| {
            warn!(%query, error = %err, "current weather request failed");
            FetchError::from(err)
        })?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%query, %status, "provider returned an error status");
            return Err(status_error(status, &body));
        }

        // A 2xx body can still carry a failure in `cod`.
        let envelope: StatusEnvelope = serde_json::from_str(&body)?;
        if envelope.cod != 200 {
            warn!(%query, cod = envelope.cod, "provider reported an in-band failure");
            let code = u16::try_from(envelope.cod).ok();
            let message = envelope
                .message
                .unwrap_or_else(|| format!("Provider returned cod {}", envelope.cod));
            return Err(FetchError::network(code, message));
        }

        let parsed: RawWeatherResponse = serde_json::from_str(&body).map_err(|err| {
            warn!(%query, error = %err, "unexpected current weather payload");
            FetchError::from(err)
        })?;

        debug!(
            location = %parsed.name,
            observed_at = ?parsed.observed_at(),
            "received current weather"
        );

        Ok(parsed)
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    async fn fetch_by_name(&self, query: &str) -> Result<RawWeatherResponse, FetchError> {
        self.fetch_current(&LocationQuery::Text(query.to_string())).await
    }

    async fn fetch_by_location(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<RawWeatherResponse, FetchError> {
        self.fetch_current(&LocationQuery::Coordinates { lat, lon }).await
    }
}

fn status_error(status: StatusCode, body: &str) -> FetchError {
    let mut message = format!("HTTP {}", status.as_u16());
    if let Some(reason) = status.canonical_reason() {
        message.push(' ');
        message.push_str(reason);
    }

    let detail = serde_json::from_str::<StatusEnvelope>(body).ok().and_then(|e| e.message);
    if let Some(detail) = detail.filter(|d| !d.is_empty()) {
        message.push_str(": ");
        message.push_str(&detail);
    }

    FetchError::network(Some(status.as_u16()), message)
}
