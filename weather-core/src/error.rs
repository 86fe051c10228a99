use thiserror::Error;

/// Failures surfaced by a [`WeatherFetcher`](crate::provider::WeatherFetcher).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure or a non-success status from the provider.
    #[error("{message}")]
    Network { status: Option<u16>, message: String },

    /// The payload did not have the expected shape.
    #[error("{message}")]
    Decode { message: String },

    #[error("Device location is unavailable")]
    LocationUnavailable,
}

impl FetchError {
    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        FetchError::Network { status, message: message.into() }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        FetchError::Decode { message: message.into() }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Network { status, .. } => *status,
            _ => None,
        }
    }

    /// The single string shown to the user when a fetch fails.
    pub fn user_message(&self) -> String {
        if let FetchError::Network { status: Some(code), message } = self {
            return format!("Error message {message} Error code {code}");
        }

        let message = self.to_string();
        if message.trim().is_empty() { "Error".to_string() } else { message }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return FetchError::decode(err.to_string());
        }
        FetchError::network(err.status().map(|s| s.as_u16()), err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::decode(err.to_string())
    }
}
