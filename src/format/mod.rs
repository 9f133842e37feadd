//! Output formatters
//!
//! Provides trait-based output formatting for resolved locations, place
//! lists, distances and routes.

pub mod gpx;
pub mod json;
pub mod text;

use crate::error::{Error, Result};
use crate::geo::{PlaceResult, ResolvedLocation};
use crate::service::route::RouteResult;
use crate::service::DistanceReport;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Anything a command can print
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Report<'a> {
    Location(&'a ResolvedLocation),
    Places(&'a [PlaceResult]),
    Distance(&'a DistanceReport),
    Route(&'a RouteResult),
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Render a report
    fn format(&self, report: &Report<'_>) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Full JSON response".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable text".to_string(),
        },
        FormatInfo {
            name: "gpx".to_string(),
            description: "GPX waypoints and route track".to_string(),
        },
    ]
}

/// Error for a format name `get_formatter` does not know, listing the valid ones
pub fn unknown_format(name: &str) -> Error {
    let names: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
    Error::Config(format!(
        "Unknown format: {} (available: {})",
        name,
        names.join(", ")
    ))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::geo::{Coordinates, LocationSource, PlaceResult, ResolvedLocation};
    use crate::service::route::{RouteResult, TravelMode};
    use crate::service::DistanceReport;

    pub fn location() -> ResolvedLocation {
        ResolvedLocation {
            coordinates: Coordinates::new(116.482086, 39.990496),
            formatted_address: "北京市朝阳区阜通东大街6号".to_string(),
            name: "方恒国际".to_string(),
            province: Some("北京市".to_string()),
            city: Some("北京市".to_string()),
            district: Some("朝阳区".to_string()),
            source: LocationSource::Provider,
        }
    }

    pub fn places() -> Vec<PlaceResult> {
        vec![
            PlaceResult {
                id: "B000A8UIN8".to_string(),
                name: "故宫博物院".to_string(),
                coordinates: Coordinates::new(116.397026, 39.918058),
                address: "景山前街4号".to_string(),
                place_type: "风景名胜".to_string(),
                city: "北京市".to_string(),
                distance_m: None,
            },
            PlaceResult {
                id: "B000A7BM4H".to_string(),
                name: "M&M's <旗舰店>".to_string(),
                coordinates: Coordinates::new(116.41, 39.91),
                address: "王府井大街".to_string(),
                place_type: "购物服务".to_string(),
                city: "北京市".to_string(),
                distance_m: Some(420.0),
            },
        ]
    }

    pub fn distance() -> DistanceReport {
        let from = ResolvedLocation {
            name: "北京".to_string(),
            ..location()
        };
        let to = ResolvedLocation {
            coordinates: Coordinates::new(121.473701, 31.230416),
            name: "上海".to_string(),
            ..location()
        };
        DistanceReport {
            from,
            to,
            distance_km: 1068.19,
        }
    }

    pub fn route() -> RouteResult {
        RouteResult {
            success: true,
            mode: TravelMode::Driving,
            distance_km: 12.5,
            duration_min: 32,
            path: vec![
                Coordinates::new(116.1, 39.1),
                Coordinates::new(116.2, 39.2),
                Coordinates::new(116.3, 39.3),
            ],
            origin_location: Some(Coordinates::new(116.1, 39.1)),
            dest_location: Some(Coordinates::new(116.3, 39.3)),
            error_message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_formatter() {
        assert!(get_formatter("json").is_some());
        assert!(get_formatter("text").is_some());
        assert!(get_formatter("gpx").is_some());
        assert!(get_formatter("url").is_none());
        assert!(get_formatter("unknown").is_none());
    }

    #[test]
    fn test_get_formatter_case_insensitive() {
        assert!(get_formatter("JSON").is_some());
        assert!(get_formatter("Text").is_some());
        assert!(get_formatter("GPX").is_some());
    }

    #[test]
    fn test_unknown_format_lists_choices() {
        let err = unknown_format("yaml");
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown format: yaml (available: json, text, gpx)"
        );
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert_eq!(formats.len(), 3);
        for info in &formats {
            let formatter = get_formatter(&info.name).unwrap();
            assert_eq!(formatter.name(), info.name);
            assert_eq!(formatter.description(), info.description);
        }
    }
}
