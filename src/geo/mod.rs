//! Geographic primitives
//!
//! Coordinates, resolved locations, place results, the static gazetteer and
//! great-circle distance.

pub mod distance;
pub mod gazetteer;

use crate::constants::geo::{DEFAULT_CITY, DEFAULT_LAT, DEFAULT_LNG, DEFAULT_NAME};
use crate::error::MapError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate, longitude first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Longitude: -180 to 180
    /// Latitude: -90 to 90
    pub fn validate(&self) -> Result<(), MapError> {
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(MapError::Parse(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(MapError::Parse(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        Ok(())
    }

    /// Parse a `"lng,lat"` pair, tolerating whitespace around either number
    ///
    /// Both parts must be plain signed decimals; exponents, `inf` and `NaN`
    /// are rejected, as are values outside the valid ranges.
    pub fn parse_pair(s: &str) -> Result<Self, MapError> {
        let (lng, lat) = s
            .split_once(',')
            .ok_or_else(|| MapError::Parse(format!("Not a coordinate pair: '{}'", s)))?;
        let coords = Self::new(parse_decimal(lng)?, parse_decimal(lat)?);
        coords.validate()?;
        Ok(coords)
    }

    /// Great-circle distance to another point in kilometres
    pub fn distance_km_to(&self, other: &Coordinates) -> f64 {
        distance::distance_km(self.lng, self.lat, other.lng, other.lat)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lng, self.lat)
    }
}

fn parse_decimal(raw: &str) -> Result<f64, MapError> {
    let s = raw.trim();
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut dots = 0;
    let well_formed = !digits.is_empty()
        && digits.chars().all(|c| {
            if c == '.' {
                dots += 1;
                true
            } else {
                c.is_ascii_digit()
            }
        })
        && dots <= 1
        && digits.chars().any(|c| c.is_ascii_digit());

    if !well_formed {
        return Err(MapError::Parse(format!("Invalid number: '{}'", s)));
    }
    s.parse()
        .map_err(|_| MapError::Parse(format!("Invalid number: '{}'", s)))
}

/// A normalized, non-empty location descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Trim the raw input; blank input is rejected
    pub fn parse(raw: &str) -> Result<Self, MapError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MapError::Validation("location query is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which stage of the resolution chain produced a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// Literal `"lng, lat"` input
    Coordinate,
    /// Static city or landmark table
    Gazetteer,
    /// Remote mapping provider
    Provider,
    /// Hardcoded default placeholder
    Fallback,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinate => write!(f, "coordinate"),
            Self::Gazetteer => write!(f, "gazetteer"),
            Self::Provider => write!(f, "provider"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A geocoded point with address metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub formatted_address: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub source: LocationSource,
}

impl ResolvedLocation {
    /// The placeholder returned when every resolution stage fails
    pub fn default_fallback() -> Self {
        Self {
            coordinates: default_coordinates(),
            formatted_address: DEFAULT_NAME.to_string(),
            name: DEFAULT_NAME.to_string(),
            province: None,
            city: None,
            district: None,
            source: LocationSource::Fallback,
        }
    }

    /// Whether this is real data rather than the default placeholder
    pub fn is_fallback(&self) -> bool {
        self.source == LocationSource::Fallback
    }
}

/// Coordinate of the default fallback location
pub fn default_coordinates() -> Coordinates {
    Coordinates::new(DEFAULT_LNG, DEFAULT_LAT)
}

/// One place search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub address: String,
    #[serde(rename = "type")]
    pub place_type: String,
    pub city: String,
    /// Distance from the search centre in metres (nearby search only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

/// POI type reported for landmark hits
pub const LANDMARK_PLACE_TYPE: &str = "景点";

/// POI type ("place name") reported for the synthetic fallback hit
pub const SYNTHETIC_PLACE_TYPE: &str = "地名";

impl PlaceResult {
    /// Single-entry placeholder named after the keyword
    pub fn synthetic(keyword: &str) -> Self {
        Self {
            id: "1".to_string(),
            name: keyword.to_string(),
            coordinates: default_coordinates(),
            address: DEFAULT_NAME.to_string(),
            place_type: SYNTHETIC_PLACE_TYPE.to_string(),
            city: DEFAULT_CITY.to_string(),
            distance_m: None,
        }
    }
}
