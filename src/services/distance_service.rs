use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Driving distance between two free-text locations, as shown to users:
/// the `*_value` fields are raw meters/seconds, the text fields are the
/// human-readable rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceInfo {
    pub distance: String,
    pub duration: String,
    pub distance_value: i64,
    pub duration_value: i64,
}

/// A detour at or under this is still worth suggesting to a driver.
pub const REASONABLE_DISTANCE_METERS: i64 = 50_000;

pub fn is_reasonable_distance(meters: i64) -> bool {
    meters <= REASONABLE_DISTANCE_METERS
}

/// "1h 30m" / "45m" / "2h", rounded to whole minutes.
pub fn format_duration(seconds: i64) -> String {
    let minutes = (seconds + 30) / 60;
    let hours = minutes / 60;
    let remaining = minutes % 60;
    if hours == 0 {
        return format!("{minutes}m");
    }
    if remaining == 0 {
        return format!("{hours}h");
    }
    format!("{hours}h {remaining}m")
}

/// Resolves driving distances between free-text locations. Implementations
/// answer `None` for a pair they cannot resolve; the matcher skips those
/// pairs instead of failing the whole matching run.
#[async_trait]
pub trait DistanceLookup: Send + Sync + 'static {
    async fn driving_distance(&self, origin: &str, destination: &str) -> Option<DistanceInfo>;
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: i64,
}

/// Google Distance Matrix client. One origin, one destination per call; the
/// matcher drives the pairing loop itself.
pub struct GoogleDistanceMatrix {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleDistanceMatrix {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl DistanceLookup for GoogleDistanceMatrix {
    async fn driving_distance(&self, origin: &str, destination: &str) -> Option<DistanceInfo> {
        let url = format!(
            "{}/maps/api/distancematrix/json",
            self.base_url.trim_end_matches('/')
        );
        let resp = match self
            .client
            .get(&url)
            .query(&[
                ("origins", origin),
                ("destinations", destination),
                ("mode", "driving"),
                ("units", "metric"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("🚗 Distance matrix upstream unreachable: {}", e);
                return None;
            }
        };

        if !resp.status().is_success() {
            warn!("🚗 Distance matrix upstream non-OK: {}", resp.status());
            return None;
        }

        let parsed: MatrixResponse = match resp.json().await {
            Ok(data) => data,
            Err(e) => {
                warn!("🚗 Distance matrix JSON parse failed: {}", e);
                return None;
            }
        };

        if parsed.status != "OK" {
            warn!("🚗 Distance matrix rejected request: {}", parsed.status);
            return None;
        }
        let element = parsed.rows.first()?.elements.first()?;
        if element.status != "OK" {
            return None;
        }
        let distance = element.distance.as_ref()?;
        let duration = element.duration.as_ref()?;

        Some(DistanceInfo {
            distance: distance.text.clone(),
            duration: duration.text.clone(),
            distance_value: distance.value,
            duration_value: duration.value,
        })
    }
}

/// Canned lookup for tests and offline development: answers only the routes
/// it was given, so unresolvable pairs are easy to stage.
#[derive(Default)]
pub struct FixedDistanceLookup {
    routes: HashMap<(String, String), DistanceInfo>,
}

impl FixedDistanceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, origin: &str, destination: &str, meters: i64, seconds: i64) -> Self {
        self.routes.insert(
            (origin.to_string(), destination.to_string()),
            DistanceInfo {
                distance: format!("{:.1} km", meters as f64 / 1000.0),
                duration: format_duration(seconds),
                distance_value: meters,
                duration_value: seconds,
            },
        );
        self
    }
}

#[async_trait]
impl DistanceLookup for FixedDistanceLookup {
    async fn driving_distance(&self, origin: &str, destination: &str) -> Option<DistanceInfo> {
        self.routes
            .get(&(origin.to_string(), destination.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_format_like_a_navigation_app() {
        assert_eq!(format_duration(45 * 60), "45m");
        assert_eq!(format_duration(90 * 60), "1h 30m");
        assert_eq!(format_duration(3600), "1h");
        assert_eq!(format_duration(2 * 3600), "2h");
        assert_eq!(format_duration(0), "0m");
        // 89.6 minutes rounds up.
        assert_eq!(format_duration(5376), "1h 30m");
    }

    #[test]
    fn reasonable_distance_boundary() {
        assert!(is_reasonable_distance(50_000));
        assert!(!is_reasonable_distance(50_001));
        assert!(is_reasonable_distance(0));
    }

    #[tokio::test]
    async fn fixed_lookup_only_knows_staged_routes() {
        let lookup = FixedDistanceLookup::new().with_route("Hafnarfjörður", "Reykjavík", 12_000, 900);
        let hit = lookup
            .driving_distance("Hafnarfjörður", "Reykjavík")
            .await
            .unwrap();
        assert_eq!(hit.distance_value, 12_000);
        assert_eq!(hit.distance, "12.0 km");
        assert_eq!(hit.duration, "15m");
        assert!(lookup
            .driving_distance("Reykjavík", "Hafnarfjörður")
            .await
            .is_none());
    }
}
