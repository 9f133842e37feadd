//! Route planning
//!
//! Validates a request, asks the provider for directions and packages the
//! outcome for the map surface. Failures are reported in the result rather
//! than replaced with a default route, and nothing is retried.

use crate::error::MapError;
use crate::geo::Coordinates;
use crate::provider::{Directions, MapProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Travel mode of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Driving,
    Bus,
    Walking,
    Train,
    Bicycling,
    Plane,
}

impl Default for TravelMode {
    fn default() -> Self {
        Self::Driving
    }
}

impl TravelMode {
    /// Every mode, in menu order
    pub fn all() -> [TravelMode; 6] {
        [
            Self::Driving,
            Self::Bus,
            Self::Walking,
            Self::Train,
            Self::Bicycling,
            Self::Plane,
        ]
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Driving => "驾车",
            Self::Bus => "公交",
            Self::Walking => "步行",
            Self::Train => "火车",
            Self::Bicycling => "骑行",
            Self::Plane => "飞机",
        }
    }

    /// Polyline styling for the map surface
    pub fn style(&self) -> RouteStyle {
        let (stroke_color, dashed) = match self {
            Self::Driving => ("#FFE66D", false),
            Self::Bus => ("#45B7D1", false),
            Self::Train => ("#4ECDC4", false),
            Self::Walking => ("#FF6B6B", false),
            Self::Bicycling => ("#95E77E", false),
            Self::Plane => ("#C780E8", true),
        };
        RouteStyle {
            stroke_color,
            dashed,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driving => write!(f, "driving"),
            Self::Bus => write!(f, "bus"),
            Self::Walking => write!(f, "walking"),
            Self::Train => write!(f, "train"),
            Self::Bicycling => write!(f, "bicycling"),
            Self::Plane => write!(f, "plane"),
        }
    }
}

impl std::str::FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" | "drive" | "car" => Ok(Self::Driving),
            "bus" | "transit" => Ok(Self::Bus),
            "walking" | "walk" => Ok(Self::Walking),
            "train" | "rail" => Ok(Self::Train),
            "bicycling" | "bicycle" | "bike" | "cycling" => Ok(Self::Bicycling),
            "plane" | "flight" | "fly" => Ok(Self::Plane),
            _ => Err(format!("Unknown travel mode: {}", s)),
        }
    }
}

/// Stroke styling token for a route polyline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteStyle {
    pub stroke_color: &'static str,
    pub dashed: bool,
}

/// A route query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub mode: TravelMode,
}

impl RouteRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, mode: TravelMode) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            mode,
        }
    }
}

/// Outcome of route planning
///
/// When `success` is false, `path` is empty and `error_message` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub success: bool,
    pub mode: TravelMode,
    pub distance_km: f64,
    pub duration_min: u64,
    pub path: Vec<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_location: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_location: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RouteResult {
    pub fn found(mode: TravelMode, directions: Directions) -> Self {
        Self {
            success: true,
            mode,
            distance_km: directions.distance_km,
            duration_min: directions.duration_min,
            path: directions.path,
            origin_location: Some(directions.origin),
            dest_location: Some(directions.destination),
            error_message: None,
        }
    }

    pub fn failed(mode: TravelMode, error: &MapError) -> Self {
        Self {
            success: false,
            mode,
            distance_km: 0.0,
            duration_min: 0,
            path: Vec::new(),
            origin_location: None,
            dest_location: None,
            error_message: Some(error.to_string()),
        }
    }
}

/// Plans routes through a mapping provider
pub struct RoutePlanner<P> {
    provider: Arc<P>,
}

impl<P: MapProvider> RoutePlanner<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Plan a route, reporting any failure in the result
    pub async fn plan_route(&self, request: &RouteRequest) -> RouteResult {
        match self.try_plan_route(request).await {
            Ok(directions) => RouteResult::found(request.mode, directions),
            Err(err) => {
                warn!(
                    origin = %request.origin,
                    destination = %request.destination,
                    mode = %request.mode,
                    "Route planning failed: {}",
                    err
                );
                RouteResult::failed(request.mode, &err)
            }
        }
    }

    /// Plan a route, surfacing the error kind
    pub async fn try_plan_route(&self, request: &RouteRequest) -> Result<Directions, MapError> {
        let origin = request.origin.trim();
        let destination = request.destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(MapError::Validation(
                "origin and destination are required".to_string(),
            ));
        }

        debug!(origin, destination, mode = %request.mode, "Planning route");
        self.provider
            .directions(origin, destination, request.mode)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::FakeProvider;
    use std::str::FromStr;

    fn sample_directions() -> Directions {
        Directions {
            distance_km: 12.3,
            duration_min: 25,
            path: vec![
                Coordinates::new(116.1, 39.1),
                Coordinates::new(116.2, 39.2),
                Coordinates::new(116.3, 39.3),
            ],
            origin: Coordinates::new(116.1, 39.1),
            destination: Coordinates::new(116.3, 39.3),
        }
    }

    #[tokio::test]
    async fn test_empty_origin_fails_without_network() {
        let provider = Arc::new(FakeProvider::default().with_directions(sample_directions()));
        let planner = RoutePlanner::new(provider.clone());

        let result = planner
            .plan_route(&RouteRequest::new("", "X", TravelMode::Driving))
            .await;

        assert!(!result.success);
        assert!(result.path.is_empty());
        assert!(result
            .error_message
            .as_deref()
            .unwrap()
            .contains("origin and destination are required"));
        assert_eq!(provider.direction_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_destination_is_validation_error() {
        let planner = RoutePlanner::new(Arc::new(FakeProvider::default()));
        let err = planner
            .try_plan_route(&RouteRequest::new("北京", "   ", TravelMode::Walking))
            .await
            .unwrap_err();
        assert!(matches!(err, MapError::Validation(_)));
    }

    #[tokio::test]
    async fn test_successful_route() {
        let provider = Arc::new(FakeProvider::default().with_directions(sample_directions()));
        let planner = RoutePlanner::new(provider.clone());

        let result = planner
            .plan_route(&RouteRequest::new(" 北京 ", "天津", TravelMode::Train))
            .await;

        assert!(result.success);
        assert_eq!(result.mode, TravelMode::Train);
        assert_eq!(result.distance_km, 12.3);
        assert_eq!(result.duration_min, 25);
        assert_eq!(result.path.len(), 3);
        assert_eq!(result.origin_location, Some(Coordinates::new(116.1, 39.1)));
        assert_eq!(result.dest_location, Some(Coordinates::new(116.3, 39.3)));
        assert!(result.error_message.is_none());

        // descriptors are passed through trimmed
        let last = provider.last_direction.lock().unwrap().clone();
        assert_eq!(
            last,
            Some(("北京".to_string(), "天津".to_string(), TravelMode::Train))
        );
    }

    #[tokio::test]
    async fn test_network_failure_is_reported() {
        let provider = Arc::new(FakeProvider::offline());
        let planner = RoutePlanner::new(provider.clone());

        let result = planner
            .plan_route(&RouteRequest::new("北京", "上海", TravelMode::Driving))
            .await;

        assert!(!result.success);
        assert!(result.path.is_empty());
        assert_eq!(
            result.error_message.as_deref(),
            Some("Network error: connection refused")
        );
        // no automatic retry
        assert_eq!(provider.direction_calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported() {
        let planner = RoutePlanner::new(Arc::new(FakeProvider::default()));
        let result = planner
            .plan_route(&RouteRequest::new("北京", "上海", TravelMode::Bus))
            .await;
        assert!(!result.success);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Provider error: no route found")
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(TravelMode::from_str("driving").unwrap(), TravelMode::Driving);
        assert_eq!(TravelMode::from_str("Plane").unwrap(), TravelMode::Plane);
        assert_eq!(TravelMode::from_str("bike").unwrap(), TravelMode::Bicycling);
        assert!(TravelMode::from_str("teleport").is_err());

        for mode in TravelMode::all() {
            assert_eq!(TravelMode::from_str(&mode.to_string()).unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&TravelMode::Bicycling).unwrap();
        assert_eq!(json, "\"bicycling\"");
        let mode: TravelMode = serde_json::from_str("\"bus\"").unwrap();
        assert_eq!(mode, TravelMode::Bus);
    }

    #[test]
    fn test_mode_styles() {
        assert_eq!(TravelMode::Driving.style().stroke_color, "#FFE66D");
        assert_eq!(TravelMode::Walking.style().stroke_color, "#FF6B6B");
        assert!(TravelMode::Plane.style().dashed);
        assert!(TravelMode::all()
            .iter()
            .filter(|m| **m != TravelMode::Plane)
            .all(|m| !m.style().dashed));
    }

    #[test]
    fn test_failed_result_serialization() {
        let result = RouteResult::failed(
            TravelMode::Walking,
            &MapError::Validation("origin and destination are required".to_string()),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["mode"], "walking");
        assert_eq!(json["path"], serde_json::json!([]));
        assert!(json.get("origin_location").is_none());
    }
}
