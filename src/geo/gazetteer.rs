//! Static gazetteer
//!
//! Read-only tables of well-known cities and landmarks. Both tables are
//! ordered slices so lookups are deterministic: the landmark scan returns the
//! first entry in declaration order, with no ranking among multiple matches.

use crate::geo::Coordinates;

/// Trailing administrative markers stripped before a city lookup
/// (city, province, county, district)
const ADMIN_SUFFIXES: [char; 4] = ['市', '省', '县', '区'];

/// A city entry: name, longitude, latitude
pub type CityEntry = (&'static str, f64, f64);

/// A landmark entry: name, longitude, latitude, city
pub type LandmarkEntry = (&'static str, f64, f64, &'static str);

const CITIES: &[CityEntry] = &[
    ("北京", 116.397428, 39.90923),
    ("上海", 121.473701, 31.230416),
    ("广州", 113.264434, 23.129162),
    ("深圳", 114.057868, 22.543099),
    ("杭州", 120.155070, 30.274085),
    ("成都", 104.066540, 30.572269),
    ("重庆", 106.551557, 29.563009),
    ("武汉", 114.305392, 30.593098),
    ("西安", 108.940174, 34.341568),
    ("南京", 118.796877, 32.060255),
    ("天津", 117.200983, 39.084158),
    ("苏州", 120.585315, 31.298886),
    ("厦门", 118.089425, 24.479834),
    ("青岛", 120.382640, 36.067082),
    ("大连", 121.614682, 38.914003),
    ("沈阳", 123.431475, 41.805698),
    ("长沙", 112.938814, 28.228209),
    ("郑州", 113.665412, 34.757975),
    ("合肥", 117.283042, 31.861190),
    ("福州", 119.306239, 26.075302),
    ("南宁", 108.320004, 22.824020),
    ("昆明", 102.712251, 25.040609),
    ("贵阳", 106.713478, 26.578343),
    ("南昌", 115.892151, 28.676493),
    ("海口", 110.331190, 20.031971),
    ("三亚", 109.508268, 18.247872),
    ("拉萨", 91.132212, 29.660361),
    ("乌鲁木齐", 87.617733, 43.792818),
    ("呼和浩特", 111.670801, 40.818311),
    ("银川", 106.278179, 38.466370),
    ("西宁", 101.778916, 36.623178),
    ("兰州", 103.823557, 36.058039),
];

const LANDMARKS: &[LandmarkEntry] = &[
    // 北京
    ("天安门", 116.397428, 39.90923, "北京"),
    ("故宫", 116.397026, 39.918058, "北京"),
    ("颐和园", 116.271203, 39.999872, "北京"),
    ("长城", 116.570374, 40.431908, "北京"),
    ("王府井", 116.417428, 39.91923, "北京"),
    // 上海
    ("外滩", 121.490317, 31.242452, "上海"),
    ("东方明珠", 121.499817, 31.239667, "上海"),
    ("南京路", 121.475317, 31.238452, "上海"),
    ("城隍庙", 121.493317, 31.227452, "上海"),
    ("迪士尼", 121.669873, 31.148036, "上海"),
    // 广州
    ("广州塔", 113.324590, 23.106680, "广州"),
    ("珠江新城", 113.321730, 23.119340, "广州"),
    ("北京路", 113.267500, 23.127300, "广州"),
    // 深圳
    ("世界之窗", 113.973160, 22.537500, "深圳"),
    ("深圳湾", 113.943000, 22.520000, "深圳"),
    // 成都
    ("宽窄巷子", 104.060200, 30.663400, "成都"),
    ("锦里", 104.054500, 30.650400, "成都"),
    ("熊猫基地", 104.147500, 30.734300, "成都"),
    // 杭州
    ("西湖", 120.155070, 30.274085, "杭州"),
    ("雷峰塔", 120.148230, 30.230820, "杭州"),
    ("灵隐寺", 120.097000, 30.237600, "杭州"),
];

/// A matched landmark
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub name: &'static str,
    pub coordinates: Coordinates,
    pub city: &'static str,
}

/// Lookup tables for cities and landmarks
#[derive(Debug, Clone)]
pub struct StaticGazetteer {
    cities: &'static [CityEntry],
    landmarks: &'static [LandmarkEntry],
}

impl StaticGazetteer {
    /// The built-in tables
    pub fn new() -> Self {
        Self {
            cities: CITIES,
            landmarks: LANDMARKS,
        }
    }

    /// Custom tables (for testing)
    pub fn with_tables(
        cities: &'static [CityEntry],
        landmarks: &'static [LandmarkEntry],
    ) -> Self {
        Self { cities, landmarks }
    }

    /// Look up a city by name, ignoring trailing administrative suffixes
    ///
    /// Returns the canonical city name and its coordinate.
    pub fn city(&self, name: &str) -> Option<(&'static str, Coordinates)> {
        let stripped = strip_admin_suffixes(name.trim());
        self.cities
            .iter()
            .find(|(city, _, _)| *city == stripped)
            .map(|&(city, lng, lat)| (city, Coordinates::new(lng, lat)))
    }

    /// Find the first landmark where either name contains the other
    pub fn landmark(&self, keyword: &str) -> Option<Landmark> {
        if keyword.is_empty() {
            return None;
        }
        self.landmarks
            .iter()
            .find(|(name, _, _, _)| keyword.contains(name) || name.contains(keyword))
            .map(|&(name, lng, lat, city)| Landmark {
                name,
                coordinates: Coordinates::new(lng, lat),
                city,
            })
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn landmark_count(&self) -> usize {
        self.landmarks.len()
    }
}

impl Default for StaticGazetteer {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove trailing 市/省/县/区 markers ("北京市" → "北京")
pub fn strip_admin_suffixes(name: &str) -> &str {
    name.trim_end_matches(ADMIN_SUFFIXES.as_slice())
}
