use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::{error::WeatherError, request::ApiRequest};

/// A completed HTTP exchange: whatever status the provider answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes a GET. Only transport-level failures are errors here;
/// non-success statuses come back as a [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("disaster-weather/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, timeout })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, WeatherError> {
        debug!(url = %request.url, "sending weather API request");

        let mut builder = self.http.get(&request.url);
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let res = builder.send().await.map_err(|e| self.map_err(e))?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(|e| self.map_err(e))?;

        debug!(status, bytes = body.len(), "weather API responded");
        Ok(RawResponse { status, body })
    }
}

impl HttpTransport {
    fn map_err(&self, err: reqwest::Error) -> WeatherError {
        if err.is_timeout() {
            WeatherError::timeout(self.timeout.as_secs())
        } else {
            WeatherError::network(err.to_string())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(301, "").is_success());
        assert!(!RawResponse::new(500, "Internal Error").is_success());
    }

    #[test]
    fn http_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(10)).is_ok());
    }
}
