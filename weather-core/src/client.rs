use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::WeatherError,
    interpret::interpret,
    model::{SearchCriteria, WeatherResult},
    request::{ApiRequest, build_stations_request, build_weather_request},
    stations::{StationCache, StationDirectory},
    transport::{HttpTransport, RawResponse, Transport},
};

/// Request builder, transport and response interpreter wired together,
/// plus the session's station directory cache.
#[derive(Debug)]
pub struct WeatherClient {
    config: Config,
    transport: Arc<dyn Transport>,
    stations: StationCache,
}

impl WeatherClient {
    /// Client talking to the configured provider over HTTPS.
    ///
    /// A missing API key is not an error here; it surfaces on the first
    /// search instead.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport, stations: StationCache::new() }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// One search: build, send, interpret. Nothing is sent if the request
    /// cannot be built.
    pub async fn fetch_weather(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<WeatherResult, WeatherError> {
        let request = build_weather_request(&self.config, criteria)?;
        let response = self.send(&request).await?;
        interpret(criteria.mode, response)
    }

    /// The station directory, fetched on first use and then cached.
    pub async fn stations(&self) -> Result<Arc<StationDirectory>, WeatherError> {
        self.stations.get_or_load(|| self.fetch_stations()).await
    }

    /// Discard the cached directory and fetch it again.
    pub async fn refresh_stations(&self) -> Result<Arc<StationDirectory>, WeatherError> {
        self.stations.invalidate().await;
        self.stations().await
    }

    async fn fetch_stations(&self) -> Result<StationDirectory, WeatherError> {
        let request = build_stations_request(&self.config)?;
        StationDirectory::from_response(self.send(&request).await?)
    }

    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, WeatherError> {
        let timeout = self.config.timeout();
        debug!(url = %request.url, ?timeout, "dispatching request");

        match tokio::time::timeout(timeout, self.transport.get(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(url = %request.url, ?timeout, "request timed out");
                Err(WeatherError::timeout(timeout.as_secs()))
            }
        }
    }
}
