//! wayfinder: location resolution and route planning
//!
//! A library and CLI tool that turns free-form location descriptors into
//! coordinates, searches places by keyword and plans routes, backed by a
//! remote mapping provider (AMap) with a static gazetteer and in-memory
//! caches in front of it.
//!
//! ## Features
//!
//! - Geocoding fallback chain: cache, literal `lng,lat`, city table,
//!   provider, default location
//! - Keyword and nearby place search with landmark shortcuts
//! - Haversine great-circle distance
//! - Route planning for driving, transit, walking, cycling and flights
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use wayfinder::geo::distance::distance_km;
//! use wayfinder::geo::gazetteer::StaticGazetteer;
//!
//! let gazetteer = StaticGazetteer::new();
//! let (_, beijing) = gazetteer.city("北京市").unwrap();
//! let (_, shanghai) = gazetteer.city("上海").unwrap();
//!
//! let km = distance_km(beijing.lng, beijing.lat, shanghai.lng, shanghai.lat);
//! assert!((km - 1068.0).abs() < 1.0);
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod provider;
pub mod server;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, MapError, Result};
pub use geo::{Coordinates, PlaceResult, ResolvedLocation};
pub use provider::{AmapClient, MapProvider};
pub use service::{MapService, RouteRequest, RouteResult, TravelMode};
