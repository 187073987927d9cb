//! Turns search criteria into a single outbound GET.

use crate::{
    config::Config,
    error::WeatherError,
    model::{SearchCriteria, SearchMode},
};

pub const API_KEY_HEADER: &str = "x-api-key";

/// A fully assembled GET request, ready for a [`Transport`](crate::transport::Transport).
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub api_key: String,
}

impl ApiRequest {
    /// Headers to attach, credential included.
    pub fn headers(&self) -> [(&'static str, &str); 1] {
        [(API_KEY_HEADER, self.api_key.as_str())]
    }
}

// Keep the credential out of logs and panic messages.
impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest").field("url", &self.url).field("api_key", &"***").finish()
    }
}

/// Build the weather request for one submission.
///
/// The credential is checked before the criteria, so a missing key is
/// reported even when the form is also incomplete.
pub fn build_weather_request(
    config: &Config,
    criteria: &SearchCriteria,
) -> Result<ApiRequest, WeatherError> {
    let api_key = config.require_api_key()?;
    let term = criteria
        .search_term()
        .ok_or(WeatherError::Validation { field: criteria.required_field() })?;

    let (path, param) = match criteria.mode {
        SearchMode::Domestic => ("india/weather", "city"),
        SearchMode::Global => ("global/weather", "location"),
    };

    Ok(ApiRequest {
        url: format!("{}/{path}?{param}={}", base(config), urlencoding::encode(term)),
        api_key: api_key.to_string(),
    })
}

/// Build the station directory request.
pub fn build_stations_request(config: &Config) -> Result<ApiRequest, WeatherError> {
    let api_key = config.require_api_key()?;
    Ok(ApiRequest { url: format!("{}/india/cities", base(config)), api_key: api_key.to_string() })
}

fn base(config: &Config) -> &str {
    config.base_url.trim_end_matches('/')
}
