use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, future::Future, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{error::WeatherError, model::SearchMode, transport::RawResponse};

/// Station id → display name, as offered in the domestic city picklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StationDirectory {
    stations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Station<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

impl std::fmt::Display for Station<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

impl StationDirectory {
    /// Interpret the `/india/cities` response.
    pub fn from_response(response: RawResponse) -> Result<Self, WeatherError> {
        if !response.is_success() {
            return Err(WeatherError::status(response.status, response.body));
        }

        let value: Value = serde_json::from_str(&response.body).map_err(|e| {
            WeatherError::Parse { mode: SearchMode::Domestic, message: e.to_string() }
        })?;

        let Value::Object(map) = value else {
            return Err(WeatherError::Parse {
                mode: SearchMode::Domestic,
                message: "station list is not a JSON object".to_string(),
            });
        };

        let stations = map
            .into_iter()
            .filter_map(|(id, name)| match name {
                Value::String(s) => Some((id, s)),
                Value::Number(n) => Some((id, n.to_string())),
                _ => None,
            })
            .collect();

        Ok(Self { stations })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.stations.get(id).map(String::as_str)
    }

    /// All stations, ordered by display name then id.
    pub fn sorted_by_name(&self) -> Vec<Station<'_>> {
        let mut all: Vec<_> =
            self.stations.iter().map(|(id, name)| Station { id, name }).collect();
        all.sort_by(|a, b| a.name.cmp(b.name).then(a.id.cmp(b.id)));
        all
    }

    /// Case-insensitive substring match on name or id.
    pub fn filter(&self, needle: &str) -> Vec<Station<'_>> {
        let needle = needle.trim().to_lowercase();
        self.sorted_by_name()
            .into_iter()
            .filter(|s| {
                needle.is_empty()
                    || s.name.to_lowercase().contains(&needle)
                    || s.id.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// What picking `selection` puts in the city field: the station name
    /// when `selection` is a known id, otherwise `selection` unchanged.
    pub fn resolve_city<'a>(&'a self, selection: &'a str) -> &'a str {
        self.name(selection.trim()).unwrap_or(selection)
    }
}

impl FromIterator<(String, String)> for StationDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { stations: iter.into_iter().collect() }
    }
}

/// Session-scoped, load-once holder for the station directory.
#[derive(Debug, Default)]
pub struct StationCache {
    slot: Mutex<Option<Arc<StationDirectory>>>,
}

impl StationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached directory, loading it first if this is the first call.
    ///
    /// Concurrent callers wait for the same load. A failed load leaves the
    /// cache empty so the next call tries again.
    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<StationDirectory>, WeatherError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<StationDirectory, WeatherError>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(dir) = slot.as_ref() {
            debug!(stations = dir.len(), "station directory served from cache");
            return Ok(Arc::clone(dir));
        }

        let dir = Arc::new(load().await?);
        info!(stations = dir.len(), "station directory loaded");
        *slot = Some(Arc::clone(&dir));
        Ok(dir)
    }

    /// Drop the cached directory; the next `get_or_load` fetches again.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }

    pub async fn cached(&self) -> Option<Arc<StationDirectory>> {
        self.slot.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample() -> StationDirectory {
        [("42182", "New Delhi"), ("43003", "Mumbai"), ("42867", "Nagpur")]
            .into_iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn parses_id_to_name_object() {
        let body = r#"{"42182": "New Delhi", "43003": "Mumbai", "bad": null}"#;
        let dir = StationDirectory::from_response(RawResponse::new(200, body)).unwrap();

        assert_eq!(dir.len(), 2);
        assert_eq!(dir.name("43003"), Some("Mumbai"));
    }

    #[test]
    fn failed_station_fetch_is_api_error() {
        let err = StationDirectory::from_response(RawResponse::new(403, "Forbidden")).unwrap_err();
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn non_object_station_list_is_parse_error() {
        let err = StationDirectory::from_response(RawResponse::new(200, "[]")).unwrap_err();
        assert!(matches!(err, WeatherError::Parse { .. }));
    }

    #[test]
    fn sorted_and_filtered_by_name() {
        let dir = sample();
        let names: Vec<_> = dir.sorted_by_name().iter().map(|s| s.name).collect();
        assert_eq!(names, ["Mumbai", "Nagpur", "New Delhi"]);

        let hits: Vec<_> = dir.filter("N").iter().map(|s| s.to_string()).collect();
        assert_eq!(hits, ["Nagpur (ID: 42867)", "New Delhi (ID: 42182)"]);

        assert_eq!(dir.filter("43003").len(), 1);
        assert_eq!(dir.filter("").len(), 3);
    }

    #[test]
    fn resolve_city_maps_ids_to_names() {
        let dir = sample();
        assert_eq!(dir.resolve_city("42182"), "New Delhi");
        assert_eq!(dir.resolve_city("Pune"), "Pune");
    }

    #[tokio::test]
    async fn cache_loads_once_until_invalidated() {
        let cache = StationCache::new();
        let loads = &AtomicUsize::new(0);
        let load = move || async move {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok::<_, WeatherError>(sample())
        };

        let first = cache.get_or_load(load).await.unwrap();
        let second = cache.get_or_load(load).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.invalidate().await;
        assert!(cache.cached().await.is_none());
        cache.get_or_load(load).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache = StationCache::new();

        let err = cache
            .get_or_load(|| async {
                Err::<StationDirectory, _>(WeatherError::network("connection refused"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Api { .. }));
        assert!(cache.cached().await.is_none());

        let dir = cache.get_or_load(|| async { Ok::<_, WeatherError>(sample()) }).await.unwrap();
        assert_eq!(dir.len(), 3);
    }
}
