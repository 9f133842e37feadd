//! Centralized constants for the wayfinder crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometres
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Default fallback location (Beijing, Tiananmen)
    pub const DEFAULT_LNG: f64 = 116.397428;
    pub const DEFAULT_LAT: f64 = 39.90923;
    pub const DEFAULT_NAME: &str = "北京市";
    pub const DEFAULT_CITY: &str = "北京";

    /// Search scope meaning "no city restriction"
    pub const NATIONWIDE: &str = "全国";
}

/// External API endpoints
pub mod api {
    /// AMap web service REST API (v3)
    pub const AMAP_BASE_URL: &str = "https://restapi.amap.com/v3";

    /// Environment variable consulted when no API key is configured
    pub const AMAP_KEY_ENV: &str = "AMAP_API_KEY";

    /// Maximum POIs requested per page
    pub const SEARCH_PAGE_SIZE: usize = 20;
}

/// Route estimation
pub mod route {
    /// Cruise speed used to estimate flight duration (km/h)
    pub const PLANE_SPEED_KMH: f64 = 800.0;

    /// Fixed boarding/taxi overhead added to flights (minutes)
    pub const PLANE_OVERHEAD_MIN: f64 = 60.0;
}
