//! Weather-related disaster alerts derived from forecast text and rain chance.

use serde::Serialize;

use crate::model::{DomesticForecastDay, GlobalForecastDay, WeatherResult};

/// Rain chance (percent) above which a global forecast day counts as heavy rain.
pub const HEAVY_RAIN_CHANCE_PCT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    FloodRisk,
    StormWarning,
    HeavyRainfall,
    NoAlerts,
}

/// One banner. Everything but the kind is fixed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: &'static str,
    pub severity: Severity,
    pub caption: &'static str,
    pub message: &'static str,
}

impl AlertKind {
    pub fn alert(self) -> Alert {
        let (title, severity, caption, message) = match self {
            AlertKind::FloodRisk => (
                "Flood Risk Alert",
                Severity::Critical,
                "Based on forecast",
                "Heavy rainfall forecast may lead to flooding in low-lying areas.",
            ),
            AlertKind::StormWarning => (
                "Storm Warning",
                Severity::Warning,
                "Based on forecast",
                "Storm conditions expected. Secure loose items and stay indoors during peak periods.",
            ),
            AlertKind::HeavyRainfall => (
                "Heavy Rainfall Warning",
                Severity::Warning,
                "Based on forecast",
                "High probability of heavy rainfall. Exercise caution in flood-prone areas.",
            ),
            AlertKind::NoAlerts => (
                "No Weather Alerts",
                Severity::Info,
                "Current status",
                "Weather conditions do not currently indicate heightened disaster risk.",
            ),
        };
        Alert { kind: self, title, severity, caption, message }
    }
}

/// Evaluate every predicate for the result's mode, in priority order.
///
/// Never empty: when nothing fires the single entry is [`AlertKind::NoAlerts`].
pub fn derive_alerts(result: &WeatherResult) -> Vec<Alert> {
    let mut kinds = Vec::new();

    match result {
        WeatherResult::Domestic(w) => {
            if w.forecast.iter().any(is_flood_risk) {
                kinds.push(AlertKind::FloodRisk);
            }
            if w.forecast.iter().any(is_storm) {
                kinds.push(AlertKind::StormWarning);
            }
        }
        WeatherResult::Global(w) => {
            if w.forecast.iter().any(is_heavy_rainfall) {
                kinds.push(AlertKind::HeavyRainfall);
            }
        }
    }

    if kinds.is_empty() {
        kinds.push(AlertKind::NoAlerts);
    }
    kinds.into_iter().map(AlertKind::alert).collect()
}

fn description_contains_any(description: Option<&str>, needles: &[&str]) -> bool {
    description.is_some_and(|d| {
        let d = d.to_lowercase();
        needles.iter().any(|n| d.contains(n))
    })
}

fn is_flood_risk(day: &DomesticForecastDay) -> bool {
    description_contains_any(day.description.as_deref(), &["heavy rain", "flood"])
}

fn is_storm(day: &DomesticForecastDay) -> bool {
    description_contains_any(day.description.as_deref(), &["storm", "thunder"])
}

fn is_heavy_rainfall(day: &GlobalForecastDay) -> bool {
    let likely = day.chance_of_rain_pct.is_some_and(|pct| pct > HEAVY_RAIN_CHANCE_PCT);
    let described = day.description.as_deref().is_some_and(|d| {
        let d = d.to_lowercase();
        d.contains("rain") && d.contains("heavy")
    });
    likely || described
}
