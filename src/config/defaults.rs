//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default provider API root
pub const DEFAULT_PROVIDER_BASE_URL: &str = crate::constants::api::AMAP_BASE_URL;

/// Default provider request timeout in seconds
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Default cache capacity per component (0 = unbounded)
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1024;

/// Default cache entry lifetime in seconds (0 = never expires)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 0;

/// Default search scope
pub const DEFAULT_SEARCH_CITY: &str = crate::constants::geo::NATIONWIDE;

/// Default output format
pub const DEFAULT_FORMAT: &str = "json";

/// Default travel mode
pub const DEFAULT_MODE: &str = "driving";

/// Default nearby search radius in metres
pub const DEFAULT_NEARBY_RADIUS: u32 = 1000;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "wayfinder";
