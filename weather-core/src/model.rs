use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which provider endpoint a search goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Named city in the primary serviced country (IMD stations).
    #[default]
    Domestic,
    /// Free-text location: city, airport code or "lat,long".
    Global,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Domestic => "domestic",
            SearchMode::Global => "global",
        }
    }

    pub const fn all() -> &'static [SearchMode] {
        &[SearchMode::Domestic, SearchMode::Global]
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SearchMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "domestic" | "india" => Ok(SearchMode::Domestic),
            "global" => Ok(SearchMode::Global),
            _ => Err(anyhow::anyhow!(
                "Unknown search mode '{value}'. Supported modes: domestic, global."
            )),
        }
    }
}

/// One form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub mode: SearchMode,
    pub city_name: Option<String>,
    pub location_query: Option<String>,
}

impl SearchCriteria {
    pub fn domestic(city: impl Into<String>) -> Self {
        Self { mode: SearchMode::Domestic, city_name: Some(city.into()), location_query: None }
    }

    pub fn global(location: impl Into<String>) -> Self {
        Self { mode: SearchMode::Global, city_name: None, location_query: Some(location.into()) }
    }

    /// The field the active mode requires, trimmed; `None` if blank.
    pub fn search_term(&self) -> Option<&str> {
        let raw = match self.mode {
            SearchMode::Domestic => self.city_name.as_deref(),
            SearchMode::Global => self.location_query.as_deref(),
        };
        raw.map(str::trim).filter(|s| !s.is_empty())
    }

    /// User-facing name of the required field for the active mode.
    pub fn required_field(&self) -> &'static str {
        match self.mode {
            SearchMode::Domestic => "City name",
            SearchMode::Global => "Location",
        }
    }
}

/// A successfully interpreted provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum WeatherResult {
    Domestic(DomesticWeather),
    Global(GlobalWeather),
}

impl WeatherResult {
    pub fn mode(&self) -> SearchMode {
        match self {
            WeatherResult::Domestic(_) => SearchMode::Domestic,
            WeatherResult::Global(_) => SearchMode::Global,
        }
    }

    pub fn place_name(&self) -> Option<&str> {
        match self {
            WeatherResult::Domestic(w) => w.city.as_deref(),
            WeatherResult::Global(w) => w.location.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomesticWeather {
    pub city: Option<String>,
    /// `None` when the payload has no `current` block at all.
    pub current: Option<DomesticCurrent>,
    pub astronomical: Option<Astronomical>,
    pub forecast: Vec<DomesticForecastDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomesticCurrent {
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
    pub morning_humidity_pct: Option<f64>,
    pub evening_humidity_pct: Option<f64>,
    pub rainfall_mm: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Astronomical {
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub moonrise: Option<String>,
    pub moonset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomesticForecastDay {
    pub date: Option<String>,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalWeather {
    pub location: Option<String>,
    pub current: Option<GlobalCurrent>,
    pub forecast: Vec<GlobalForecastDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalCurrent {
    pub temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_kph: Option<f64>,
    pub wind_direction: Option<String>,
    pub condition: Option<String>,
    pub uv_index: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalForecastDay {
    pub date: Option<String>,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
    pub description: Option<String>,
    pub chance_of_rain_pct: Option<f64>,
}

/// Parse a provider forecast date (`YYYY-MM-DD`), if it is one.
pub fn parse_forecast_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

impl DomesticForecastDay {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_forecast_date)
    }
}

impl GlobalForecastDay {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_forecast_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_term_uses_field_for_active_mode() {
        let mut criteria = SearchCriteria::domestic("Pune");
        criteria.location_query = Some("London".into());
        assert_eq!(criteria.search_term(), Some("Pune"));

        criteria.mode = SearchMode::Global;
        assert_eq!(criteria.search_term(), Some("London"));
    }

    #[test]
    fn blank_term_counts_as_missing() {
        assert_eq!(SearchCriteria::domestic("   ").search_term(), None);
        assert_eq!(SearchCriteria::global("").search_term(), None);
        assert_eq!(SearchCriteria::default().search_term(), None);
    }

    #[test]
    fn search_mode_roundtrip() {
        for mode in SearchMode::all() {
            assert_eq!(SearchMode::try_from(mode.as_str()).unwrap(), *mode);
        }
        assert_eq!(SearchMode::try_from("India").unwrap(), SearchMode::Domestic);
        assert!(SearchMode::try_from("mars").is_err());
    }

    #[test]
    fn forecast_dates_parse_when_iso() {
        let day = GlobalForecastDay { date: Some("2025-03-14".into()), ..Default::default() };
        assert_eq!(day.parsed_date(), NaiveDate::from_ymd_opt(2025, 3, 14));

        let day = DomesticForecastDay { date: Some("Friday".into()), ..Default::default() };
        assert_eq!(day.parsed_date(), None);
    }
}
