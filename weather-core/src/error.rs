use thiserror::Error;

use crate::model::SearchMode;

/// What went wrong on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The provider answered with a non-success status.
    Status,
    /// The request never completed (DNS, TLS, connection reset, ...).
    Network,
    /// No response within the configured timeout.
    Timeout,
}

/// Every way a search (or station lookup) can fail.
///
/// None of these are fatal: the caller renders them inline and keeps the
/// previously displayed result.
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    #[error("API key is not configured. {hint}")]
    Configuration { hint: String },

    #[error("{field} is required")]
    Validation { field: &'static str },

    #[error("{}", describe_api(.kind, .status, .body))]
    Api {
        kind: ApiErrorKind,
        status: Option<u16>,
        body: String,
    },

    #[error("Failed to parse {mode} weather response: {message}")]
    Parse { mode: SearchMode, message: String },
}

impl WeatherError {
    pub fn missing_api_key() -> Self {
        Self::Configuration {
            hint: "Hint: run `dweather configure` or set WEATHER_API_KEY.".to_string(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Api { kind: ApiErrorKind::Status, status: Some(status), body: body.into() }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Api { kind: ApiErrorKind::Network, status: None, body: message.into() }
    }

    pub fn timeout(after_secs: u64) -> Self {
        Self::Api {
            kind: ApiErrorKind::Timeout,
            status: None,
            body: format!("no response after {after_secs}s"),
        }
    }

    /// HTTP status code, if the provider answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether simply submitting the same search again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Parse { .. })
    }
}

fn describe_api(kind: &ApiErrorKind, status: &Option<u16>, body: &str) -> String {
    match (*kind, *status) {
        (ApiErrorKind::Status, Some(code)) => {
            format!("API Error ({code}): {}", truncate_body(body))
        }
        (ApiErrorKind::Timeout, _) => format!("API request timed out: {body}"),
        _ => format!("API request failed: {}", truncate_body(body)),
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_carries_code_and_body() {
        let err = WeatherError::status(500, "Internal Error");
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.to_string(), "API Error (500): Internal Error");
        assert!(err.is_retryable());
    }

    #[test]
    fn configuration_and_validation_are_not_retryable() {
        assert!(!WeatherError::missing_api_key().is_retryable());
        assert!(!WeatherError::Validation { field: "City name" }.is_retryable());
        assert_eq!(
            WeatherError::Validation { field: "Location" }.to_string(),
            "Location is required"
        );
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundary() {
        let body = "é".repeat(150);
        let msg = truncate_body(&body);
        assert!(msg.ends_with("..."));
        assert!(msg.len() <= 203);
    }

    #[test]
    fn timeout_has_no_status() {
        let err = WeatherError::timeout(10);
        assert_eq!(err.status_code(), None);
        assert!(matches!(err, WeatherError::Api { kind: ApiErrorKind::Timeout, .. }));
        assert!(err.to_string().contains("timed out"));
    }
}
