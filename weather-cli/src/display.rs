//! Human-friendly rendering of weather results and alert banners.

use std::fmt::Write;

use disaster_weather_core::{
    Alert, Severity, StationDirectory,
    model::{DomesticWeather, GlobalWeather, WeatherResult, parse_forecast_date},
};

const PLACEHOLDER: &str = "—";

fn value(v: Option<f64>, unit: &str) -> String {
    match v {
        Some(v) => format!("{v}{unit}"),
        None => PLACEHOLDER.to_string(),
    }
}

fn text(v: Option<&str>) -> &str {
    v.filter(|s| !s.trim().is_empty()).unwrap_or(PLACEHOLDER)
}

fn date_label(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => match parse_forecast_date(raw) {
            Some(date) => date.format("%a %d %b %Y").to_string(),
            None => raw.to_string(),
        },
        None => PLACEHOLDER.to_string(),
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "-".repeat(title.chars().count()));
}

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {:<18} {value}", format!("{label}:"));
}

/// Full panel: current conditions, astronomy (domestic), forecast, alerts.
pub fn render_result(result: &WeatherResult, alerts: &[Alert]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Weather for {}", text(result.place_name()));

    match result {
        WeatherResult::Domestic(w) => render_domestic(&mut out, w),
        WeatherResult::Global(w) => render_global(&mut out, w),
    }

    out.push_str(&render_alerts(alerts));
    out
}

fn render_domestic(out: &mut String, w: &DomesticWeather) {
    heading(out, "Current Conditions");
    match &w.current {
        Some(c) => {
            row(out, "Max Temperature", &value(c.max_temp_c, "°C"));
            row(out, "Min Temperature", &value(c.min_temp_c, "°C"));
            row(out, "Morning Humidity", &value(c.morning_humidity_pct, "%"));
            row(out, "Evening Humidity", &value(c.evening_humidity_pct, "%"));
            if let Some(mm) = c.rainfall_mm.filter(|mm| *mm != 0.0) {
                row(out, "Rainfall", &format!("{mm} mm"));
            }
        }
        None => out.push_str("  No current weather data available\n"),
    }

    if let Some(a) = &w.astronomical {
        heading(out, "Astronomical Data");
        row(out, "Sunrise", text(a.sunrise.as_deref()));
        row(out, "Sunset", text(a.sunset.as_deref()));
        row(out, "Moonrise", text(a.moonrise.as_deref()));
        row(out, "Moonset", text(a.moonset.as_deref()));
    }

    heading(out, "Weather Forecast");
    if w.forecast.is_empty() {
        out.push_str("  No forecast data available\n");
    }
    for day in &w.forecast {
        let _ = writeln!(
            out,
            "  {:<16} max {:>7}  min {:>7}  {}",
            date_label(day.date.as_deref()),
            value(day.max_temp_c, "°C"),
            value(day.min_temp_c, "°C"),
            day.description.as_deref().unwrap_or_default(),
        );
    }
}

fn render_global(out: &mut String, w: &GlobalWeather) {
    heading(out, "Current Conditions");
    match &w.current {
        Some(c) => {
            row(out, "Temperature", &value(c.temperature_c, "°C"));
            row(out, "Feels Like", &value(c.feels_like_c, "°C"));
            row(out, "Humidity", &value(c.humidity_pct, "%"));
            let wind = match (c.wind_speed_kph, c.wind_direction.as_deref()) {
                (None, None) => PLACEHOLDER.to_string(),
                (speed, dir) => format!("{} {}", value(speed, " km/h"), dir.unwrap_or_default())
                    .trim_end()
                    .to_string(),
            };
            row(out, "Wind", &wind);
            row(out, "Condition", text(c.condition.as_deref()));
            if let Some(uv) = c.uv_index.filter(|uv| *uv != 0.0) {
                row(out, "UV Index", &uv.to_string());
            }
        }
        None => out.push_str("  No current weather data available\n"),
    }

    heading(out, "Weather Forecast");
    if w.forecast.is_empty() {
        out.push_str("  No forecast data available\n");
    }
    for day in &w.forecast {
        let mut line = format!(
            "  {:<16} max {:>7}  min {:>7}",
            date_label(day.date.as_deref()),
            value(day.max_temp_c, "°C"),
            value(day.min_temp_c, "°C"),
        );
        if let Some(pct) = day.chance_of_rain_pct {
            let _ = write!(line, "  rain {pct}%");
        }
        if let Some(desc) = day.description.as_deref() {
            let _ = write!(line, "  {desc}");
        }
        let _ = writeln!(out, "{line}");
    }
}

pub fn render_alerts(alerts: &[Alert]) -> String {
    let mut out = String::new();
    heading(&mut out, "Weather-Related Disaster Alerts");
    for alert in alerts {
        let badge = match alert.severity {
            Severity::Critical => "[!!]",
            Severity::Warning => "[! ]",
            Severity::Info => "[ok]",
        };
        let _ = writeln!(out, "  {badge} {} ({})", alert.title, alert.caption);
        let _ = writeln!(out, "       {}", alert.message);
    }
    out
}

pub fn render_stations(dir: &StationDirectory, filter: Option<&str>) -> String {
    let stations = dir.filter(filter.unwrap_or_default());
    if stations.is_empty() {
        return "No stations found\n".to_string();
    }

    let mut out = String::from("Available IMD Stations:\n");
    for station in stations {
        let _ = writeln!(out, "  {station}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use disaster_weather_core::{
        derive_alerts,
        model::{DomesticCurrent, DomesticForecastDay, GlobalCurrent, GlobalForecastDay},
    };

    #[test]
    fn domestic_panel_shows_placeholders_and_alerts() {
        let result = WeatherResult::Domestic(DomesticWeather {
            city: Some("Mumbai".into()),
            current: Some(DomesticCurrent {
                max_temp_c: Some(33.5),
                rainfall_mm: Some(0.0),
                ..Default::default()
            }),
            astronomical: None,
            forecast: vec![DomesticForecastDay {
                date: Some("2025-07-01".into()),
                max_temp_c: Some(31.0),
                min_temp_c: None,
                description: Some("Heavy rain expected".into()),
            }],
        });

        let out = render_result(&result, &derive_alerts(&result));

        assert!(out.starts_with("Weather for Mumbai"));
        assert!(out.contains("33.5°C"));
        assert!(out.contains("Min Temperature:   —"));
        assert!(!out.contains("Rainfall"));
        assert!(!out.contains("Astronomical Data"));
        assert!(out.contains("Tue 01 Jul 2025"));
        assert!(out.contains("Flood Risk Alert (Based on forecast)"));
        assert!(!out.contains("No Weather Alerts"));
    }

    #[test]
    fn global_panel_shows_wind_and_rain_chance() {
        let result = WeatherResult::Global(GlobalWeather {
            location: Some("London".into()),
            current: Some(GlobalCurrent {
                wind_speed_kph: Some(19.0),
                wind_direction: Some("SW".into()),
                uv_index: Some(3.0),
                ..Default::default()
            }),
            forecast: vec![GlobalForecastDay {
                date: Some("tomorrow".into()),
                chance_of_rain_pct: Some(85.0),
                ..Default::default()
            }],
        });

        let out = render_result(&result, &derive_alerts(&result));

        assert!(out.contains("19 km/h SW"));
        assert!(out.contains("UV Index:"));
        assert!(out.contains("tomorrow"));
        assert!(out.contains("rain 85%"));
        assert!(out.contains("Heavy Rainfall Warning"));
    }

    #[test]
    fn missing_sections_fall_back_to_messages() {
        let result = WeatherResult::Global(GlobalWeather::default());
        let out = render_result(&result, &derive_alerts(&result));

        assert!(out.contains("Weather for —"));
        assert!(out.contains("No current weather data available"));
        assert!(out.contains("No forecast data available"));
        assert!(out.contains("[ok] No Weather Alerts"));
    }

    #[test]
    fn station_list_is_filtered() {
        let dir: StationDirectory = [("42182", "New Delhi"), ("43003", "Mumbai")]
            .into_iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();

        assert_eq!(
            render_stations(&dir, Some("delhi")),
            "Available IMD Stations:\n  New Delhi (ID: 42182)\n"
        );
        assert_eq!(render_stations(&dir, Some("Pune")), "No stations found\n");
    }
}
