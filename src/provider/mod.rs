//! Remote mapping provider boundary
//!
//! The `MapProvider` trait covers the three capabilities the services need
//! (geocoding, POI search, directions). `amap::AmapClient` implements it over
//! HTTP; tests substitute in-memory fakes.

pub mod amap;

use crate::constants::route::{PLANE_OVERHEAD_MIN, PLANE_SPEED_KMH};
use crate::error::MapError;
use crate::geo::Coordinates;
use crate::service::route::TravelMode;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use amap::AmapClient;

/// One geocoding candidate as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    /// Raw `"lng,lat"` location string
    pub location: String,
    pub formatted_address: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    /// Provider city code, used to scope transit queries
    pub city_code: Option<String>,
}

/// One point of interest as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: String,
    pub name: String,
    /// Raw `"lng,lat"` location string
    pub location: String,
    pub address: Option<String>,
    pub poi_type: Option<String>,
    pub city: Option<String>,
    /// Distance from the search centre in metres (around-search only)
    pub distance_m: Option<f64>,
}

/// A computed route between two resolved endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directions {
    pub distance_km: f64,
    pub duration_min: u64,
    pub path: Vec<Coordinates>,
    pub origin: Coordinates,
    pub destination: Coordinates,
}

impl Directions {
    /// Great-circle flight estimate between two points
    ///
    /// Distance is rounded to 0.1 km; duration assumes cruise speed plus a
    /// fixed overhead. The path is just the two endpoints.
    pub fn estimate_flight(origin: Coordinates, destination: Coordinates) -> Self {
        let distance_km = (origin.distance_km_to(&destination) * 10.0).round() / 10.0;
        let duration_min = (distance_km / PLANE_SPEED_KMH * 60.0 + PLANE_OVERHEAD_MIN).floor() as u64;
        Self {
            distance_km,
            duration_min,
            path: vec![origin, destination],
            origin,
            destination,
        }
    }
}

/// Trait for remote mapping providers
pub trait MapProvider: Send + Sync + 'static {
    /// Provider name for status output
    fn name(&self) -> &'static str;

    /// Geocode free-text address to candidate locations, best first
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Vec<GeocodeCandidate>, MapError>> + Send;

    /// Keyword search within a city (or nationwide), in relevance order
    fn search_text(
        &self,
        keyword: &str,
        city: &str,
    ) -> impl Future<Output = Result<Vec<Poi>, MapError>> + Send;

    /// Keyword search around a point within `radius_m` metres
    fn search_around(
        &self,
        center: Coordinates,
        keyword: &str,
        radius_m: u32,
    ) -> impl Future<Output = Result<Vec<Poi>, MapError>> + Send;

    /// Route between two descriptors (names or `"lng,lat"` strings)
    fn directions(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> impl Future<Output = Result<Directions, MapError>> + Send;
}
