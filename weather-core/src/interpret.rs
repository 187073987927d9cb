//! Projects provider JSON into [`WeatherResult`].
//!
//! Only the overall shape is checked. Any nested field may be missing,
//! `null` or of an unexpected scalar type and simply comes out as `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    error::WeatherError,
    model::{
        Astronomical, DomesticCurrent, DomesticForecastDay, DomesticWeather, GlobalCurrent,
        GlobalForecastDay, GlobalWeather, SearchMode, WeatherResult,
    },
    transport::RawResponse,
};

/// Interpret a completed response for the given mode.
pub fn interpret(mode: SearchMode, response: RawResponse) -> Result<WeatherResult, WeatherError> {
    if !response.is_success() {
        return Err(WeatherError::status(response.status, response.body));
    }

    let parse_err = |e: serde_json::Error| WeatherError::Parse { mode, message: e.to_string() };

    let value: Value = serde_json::from_str(&response.body).map_err(parse_err)?;
    if !value.is_object() {
        return Err(WeatherError::Parse { mode, message: "expected a JSON object".to_string() });
    }

    match mode {
        SearchMode::Domestic => {
            let parsed: WireDomestic = serde_json::from_value(value).map_err(parse_err)?;
            Ok(WeatherResult::Domestic(parsed.into()))
        }
        SearchMode::Global => {
            let parsed: WireGlobal = serde_json::from_value(value).map_err(parse_err)?;
            Ok(WeatherResult::Global(parsed.into()))
        }
    }
}

/// Accepts a number or a numeric string; anything else is absent.
fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts a string or a scalar rendered as one; anything else is absent.
fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// A nested object, or `None` if the value is not one.
fn lenient_object<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(if value.is_object() { serde_json::from_value(value).ok() } else { None })
}

/// Forecast entries that are not objects are skipped.
fn lenient_list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Deserialize)]
struct WireDomestic {
    #[serde(default, deserialize_with = "lenient_string")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    weather: Option<WireDomesticWeather>,
}

#[derive(Debug, Deserialize)]
struct WireDomesticWeather {
    #[serde(default, deserialize_with = "lenient_object")]
    current: Option<WireDomesticCurrent>,
    #[serde(default, deserialize_with = "lenient_object")]
    astronomical: Option<WireAstronomical>,
    #[serde(default, deserialize_with = "lenient_list")]
    forecast: Vec<WireDomesticDay>,
}

#[derive(Debug, Deserialize)]
struct WireDomesticCurrent {
    #[serde(default, deserialize_with = "lenient_object")]
    temperature: Option<WireTemperature>,
    #[serde(default, deserialize_with = "lenient_object")]
    humidity: Option<WireHumidity>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rainfall: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireTemperature {
    #[serde(default, deserialize_with = "lenient_object")]
    max: Option<WireValue>,
    #[serde(default, deserialize_with = "lenient_object")]
    min: Option<WireValue>,
}

#[derive(Debug, Deserialize)]
struct WireValue {
    #[serde(default, deserialize_with = "lenient_f64")]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireHumidity {
    #[serde(default, deserialize_with = "lenient_f64")]
    morning: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    evening: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireAstronomical {
    #[serde(default, deserialize_with = "lenient_string")]
    sunrise: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    sunset: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    moonrise: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    moonset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDomesticDay {
    #[serde(default, deserialize_with = "lenient_string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    max_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    min_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireGlobal {
    #[serde(default, deserialize_with = "lenient_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    current: Option<WireGlobalCurrent>,
    #[serde(default, deserialize_with = "lenient_list")]
    forecast: Vec<WireGlobalDay>,
}

#[derive(Debug, Deserialize)]
struct WireGlobalCurrent {
    #[serde(default, deserialize_with = "lenient_f64")]
    temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    wind_direction: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    uv_index: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireGlobalDay {
    #[serde(default, deserialize_with = "lenient_string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    max_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    min_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    chance_of_rain: Option<f64>,
}

impl From<WireDomestic> for DomesticWeather {
    fn from(wire: WireDomestic) -> Self {
        let (current, astronomical, forecast) = match wire.weather {
            Some(w) => (w.current, w.astronomical, w.forecast),
            None => (None, None, Vec::new()),
        };

        let current = current.map(|c| {
            let (max, min) = match c.temperature {
                Some(t) => (t.max.and_then(|v| v.value), t.min.and_then(|v| v.value)),
                None => (None, None),
            };
            let (morning, evening) = match c.humidity {
                Some(h) => (h.morning, h.evening),
                None => (None, None),
            };
            DomesticCurrent {
                max_temp_c: max,
                min_temp_c: min,
                morning_humidity_pct: morning,
                evening_humidity_pct: evening,
                rainfall_mm: c.rainfall,
            }
        });

        let astronomical = astronomical.map(|a| Astronomical {
            sunrise: a.sunrise,
            sunset: a.sunset,
            moonrise: a.moonrise,
            moonset: a.moonset,
        });

        let forecast = forecast
            .into_iter()
            .map(|d| DomesticForecastDay {
                date: d.date,
                max_temp_c: d.max_temp,
                min_temp_c: d.min_temp,
                description: d.description,
            })
            .collect();

        DomesticWeather { city: wire.city, current, astronomical, forecast }
    }
}

impl From<WireGlobal> for GlobalWeather {
    fn from(wire: WireGlobal) -> Self {
        let current = wire.current.map(|c| GlobalCurrent {
            temperature_c: c.temperature,
            feels_like_c: c.feels_like,
            humidity_pct: c.humidity,
            wind_speed_kph: c.wind_speed,
            wind_direction: c.wind_direction,
            condition: c.condition,
            uv_index: c.uv_index,
        });

        let forecast = wire
            .forecast
            .into_iter()
            .map(|d| GlobalForecastDay {
                date: d.date,
                max_temp_c: d.max_temp,
                min_temp_c: d.min_temp,
                description: d.description,
                chance_of_rain_pct: d.chance_of_rain,
            })
            .collect();

        GlobalWeather { location: wire.location, current, forecast }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMESTIC_BODY: &str = r#"{
        "city": "Mumbai",
        "weather": {
            "current": {
                "temperature": { "max": { "value": 33.1 }, "min": { "value": 26.4 } },
                "humidity": { "morning": 88, "evening": 71 },
                "rainfall": 12.5
            },
            "astronomical": { "sunrise": "06:12", "sunset": "18:58", "moonrise": "21:03" },
            "forecast": [
                { "date": "2025-07-01", "max_temp": 31, "min_temp": 26, "description": "Heavy rain expected" },
                { "date": "2025-07-02", "max_temp": "32", "min_temp": 27, "description": "Cloudy" }
            ]
        }
    }"#;

    const GLOBAL_BODY: &str = r#"{
        "location": "London, UK",
        "current": {
            "temperature": 14.2, "feels_like": 12.9, "humidity": 81,
            "wind_speed": 19, "wind_direction": "SW", "condition": "Light rain"
        },
        "forecast": [
            { "date": "2025-03-14", "max_temp": 15, "min_temp": 9, "chance_of_rain": 85 },
            { "date": "2025-03-15", "max_temp": 13, "min_temp": 7, "description": "Sunny" }
        ]
    }"#;

    #[test]
    fn domestic_payload_projects_all_fields() {
        let result = interpret(SearchMode::Domestic, RawResponse::new(200, DOMESTIC_BODY)).unwrap();
        let WeatherResult::Domestic(w) = result else { panic!("expected domestic") };

        assert_eq!(w.city.as_deref(), Some("Mumbai"));
        let current = w.current.unwrap();
        assert_eq!(current.max_temp_c, Some(33.1));
        assert_eq!(current.min_temp_c, Some(26.4));
        assert_eq!(current.morning_humidity_pct, Some(88.0));
        assert_eq!(current.evening_humidity_pct, Some(71.0));
        assert_eq!(current.rainfall_mm, Some(12.5));

        let astro = w.astronomical.unwrap();
        assert_eq!(astro.sunrise.as_deref(), Some("06:12"));
        assert_eq!(astro.moonset, None);

        assert_eq!(w.forecast.len(), 2);
        assert_eq!(w.forecast[1].max_temp_c, Some(32.0));
        assert_eq!(w.forecast[0].description.as_deref(), Some("Heavy rain expected"));
    }

    #[test]
    fn global_payload_projects_all_fields() {
        let result = interpret(SearchMode::Global, RawResponse::new(200, GLOBAL_BODY)).unwrap();
        let WeatherResult::Global(w) = result else { panic!("expected global") };

        assert_eq!(w.location.as_deref(), Some("London, UK"));
        let current = w.current.unwrap();
        assert_eq!(current.wind_direction.as_deref(), Some("SW"));
        assert_eq!(current.uv_index, None);
        assert_eq!(w.forecast[0].chance_of_rain_pct, Some(85.0));
        assert_eq!(w.forecast[0].description, None);
    }

    #[test]
    fn missing_nested_fields_are_absent_not_errors() {
        let body = r#"{ "city": "Leh", "weather": { "current": { "temperature": "n/a" }, "forecast": [1, {"date": "2025-01-01"}] } }"#;
        let result = interpret(SearchMode::Domestic, RawResponse::new(200, body)).unwrap();
        let WeatherResult::Domestic(w) = result else { panic!("expected domestic") };

        let current = w.current.unwrap();
        assert_eq!(current.max_temp_c, None);
        assert_eq!(current.morning_humidity_pct, None);
        assert!(w.astronomical.is_none());
        assert_eq!(w.forecast.len(), 1);
        assert_eq!(w.forecast[0].date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn empty_object_is_an_empty_result() {
        let result = interpret(SearchMode::Global, RawResponse::new(200, "{}")).unwrap();
        assert_eq!(result, WeatherResult::Global(GlobalWeather::default()));
    }

    #[test]
    fn non_success_status_is_api_error_with_body() {
        let err =
            interpret(SearchMode::Domestic, RawResponse::new(500, "Internal Error")).unwrap_err();

        match err {
            WeatherError::Api { status, body, .. } => {
                assert_eq!(status, Some(500));
                assert_eq!(body, "Internal Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_parse_error() {
        let err =
            interpret(SearchMode::Global, RawResponse::new(200, "<html>oops</html>")).unwrap_err();
        assert!(matches!(err, WeatherError::Parse { mode: SearchMode::Global, .. }));

        let err = interpret(SearchMode::Domestic, RawResponse::new(200, "[1, 2]")).unwrap_err();
        assert!(matches!(err, WeatherError::Parse { .. }));
    }
}
