//! AMap web service backend
//!
//! Talks to the AMap v3 REST API: `geocode/geo`, `place/text`,
//! `place/around` and the `direction/*` family. Every response carries a
//! `status` flag ("1" on success) and an `info` message otherwise.
//!
//! AMap encodes missing string fields as `[]` and missing objects as `[]`,
//! so the response structs deserialize those leniently.

use crate::config::ProviderConfig;
use crate::constants::api::SEARCH_PAGE_SIZE;
use crate::error::{Error, MapError, Result};
use crate::geo::Coordinates;
use crate::provider::{Directions, GeocodeCandidate, MapProvider, Poi};
use crate::service::route::TravelMode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("wayfinder/", env!("CARGO_PKG_VERSION"));

/// AMap HTTP client
#[derive(Debug, Clone)]
pub struct AmapClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// A route endpoint after resolution
#[derive(Debug, Clone, PartialEq)]
struct Endpoint {
    coordinates: Coordinates,
    city_code: Option<String>,
}

impl AmapClient {
    /// Create a client against a specific base URL
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a client from the `[provider]` config section
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.resolved_api_key(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/{}?key={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in params {
            url.push_str(&format!("&{}={}", name, urlencoding::encode(value)));
        }
        url
    }

    /// GET an endpoint and decode the body, checking the status flag
    async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> std::result::Result<T, MapError>
    where
        T: DeserializeOwned + HasStatus,
    {
        let url = self.url(path, params);
        debug!(path, "AMap request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MapError::Network(format!("AMap request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MapError::Provider(format!(
                "AMap returned status: {}",
                response.status()
            )));
        }

        let body: T = response
            .json()
            .await
            .map_err(|e| MapError::Provider(format!("Failed to parse AMap response: {}", e)))?;

        if body.status() != "1" {
            return Err(MapError::Provider(format!(
                "AMap error: {}",
                body.info().unwrap_or("unknown")
            )));
        }
        Ok(body)
    }

    /// Resolve a route endpoint: literal coordinates pass through, anything
    /// else goes through the geocoder
    async fn locate(&self, descriptor: &str) -> std::result::Result<Endpoint, MapError> {
        if let Ok(coordinates) = Coordinates::parse_pair(descriptor) {
            return Ok(Endpoint {
                coordinates,
                city_code: None,
            });
        }

        let candidate = self
            .geocode(descriptor)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MapError::Provider(format!("Unable to locate '{}'", descriptor)))?;

        Ok(Endpoint {
            coordinates: Coordinates::parse_pair(&candidate.location)?,
            city_code: candidate.city_code,
        })
    }
}

impl MapProvider for AmapClient {
    fn name(&self) -> &'static str {
        "amap"
    }

    async fn geocode(&self, address: &str) -> std::result::Result<Vec<GeocodeCandidate>, MapError> {
        let response: GeocodeResponse = self
            .get("geocode/geo", &[("address", address.to_string())])
            .await?;

        Ok(response
            .geocodes
            .into_iter()
            .filter_map(|g| {
                Some(GeocodeCandidate {
                    location: g.location?,
                    formatted_address: g.formatted_address,
                    province: g.province,
                    city: g.city,
                    district: g.district,
                    city_code: g.citycode.or(g.adcode),
                })
            })
            .collect())
    }

    async fn search_text(&self, keyword: &str, city: &str) -> std::result::Result<Vec<Poi>, MapError> {
        let response: PoiResponse = self
            .get(
                "place/text",
                &[
                    ("keywords", keyword.to_string()),
                    ("city", city.to_string()),
                    ("offset", SEARCH_PAGE_SIZE.to_string()),
                    ("page", "1".to_string()),
                    ("extensions", "all".to_string()),
                ],
            )
            .await?;
        Ok(response.into_pois())
    }

    async fn search_around(
        &self,
        center: Coordinates,
        keyword: &str,
        radius_m: u32,
    ) -> std::result::Result<Vec<Poi>, MapError> {
        let response: PoiResponse = self
            .get(
                "place/around",
                &[
                    ("location", center.to_string()),
                    ("keywords", keyword.to_string()),
                    ("radius", radius_m.to_string()),
                    ("offset", SEARCH_PAGE_SIZE.to_string()),
                    ("page", "1".to_string()),
                    ("extensions", "all".to_string()),
                ],
            )
            .await?;
        Ok(response.into_pois())
    }

    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> std::result::Result<Directions, MapError> {
        let from = self.locate(origin).await?;
        let to = self.locate(destination).await?;

        if mode == TravelMode::Plane {
            return Ok(Directions::estimate_flight(from.coordinates, to.coordinates));
        }

        let mut params = vec![
            ("origin", from.coordinates.to_string()),
            ("destination", to.coordinates.to_string()),
        ];
        let path = match mode {
            TravelMode::Walking => "direction/walking",
            TravelMode::Bicycling => "direction/bicycling",
            TravelMode::Bus | TravelMode::Train => {
                let city = from
                    .city_code
                    .clone()
                    .or_else(|| to.city_code.clone())
                    .unwrap_or_default();
                let city_dest = to.city_code.clone().unwrap_or_else(|| city.clone());
                params.push(("city", city));
                params.push(("cityd", city_dest));
                params.push(("strategy", "0".to_string()));
                "direction/transit/integrated"
            }
            TravelMode::Driving | TravelMode::Plane => {
                params.push(("extensions", "base".to_string()));
                params.push(("strategy", "10".to_string()));
                "direction/driving"
            }
        };

        let response: DirectionResponse = self.get(path, &params).await?;
        let route = response
            .route
            .ok_or_else(|| MapError::Provider("AMap response has no route".to_string()))?;
        let (distance_km, duration_min, mut points) = route.best(mode)?;

        if points.is_empty() {
            points = vec![from.coordinates, to.coordinates];
        }

        Ok(Directions {
            distance_km,
            duration_min,
            path: points,
            origin: from.coordinates,
            destination: to.coordinates,
        })
    }
}

/// Parse an AMap polyline (`"lng,lat;lng,lat;..."`), skipping malformed pairs
pub fn parse_polyline(polyline: &str) -> Vec<Coordinates> {
    polyline
        .split(';')
        .filter_map(|pair| Coordinates::parse_pair(pair).ok())
        .collect()
}

trait HasStatus {
    fn status(&self) -> &str;
    fn info(&self) -> Option<&str>;
}

macro_rules! has_status {
    ($($t:ty),*) => {
        $(impl HasStatus for $t {
            fn status(&self) -> &str {
                &self.status
            }
            fn info(&self) -> Option<&str> {
                self.info.as_deref()
            }
        })*
    };
}

has_status!(GeocodeResponse, PoiResponse, DirectionResponse);

/// Accept a string, a number, or AMap's `[]` placeholder
fn loose_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept an object, treating AMap's `[]` placeholder as absent
fn loose_object<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn parse_number(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0.0)
}

/// Geocode response
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default, deserialize_with = "loose_string")]
    info: Option<String>,
    #[serde(default)]
    geocodes: Vec<AmapGeocode>,
}

#[derive(Debug, Deserialize)]
struct AmapGeocode {
    #[serde(default, deserialize_with = "loose_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    formatted_address: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    province: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    city: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    district: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    citycode: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    adcode: Option<String>,
}

/// Place search response (text and around)
#[derive(Debug, Deserialize)]
struct PoiResponse {
    status: String,
    #[serde(default, deserialize_with = "loose_string")]
    info: Option<String>,
    #[serde(default)]
    pois: Vec<AmapPoi>,
}

impl PoiResponse {
    fn into_pois(self) -> Vec<Poi> {
        self.pois
            .into_iter()
            .filter_map(|p| {
                Some(Poi {
                    id: p.id.unwrap_or_default(),
                    name: p.name.unwrap_or_default(),
                    location: p.location?,
                    address: p.address,
                    poi_type: p.poi_type,
                    city: p.cityname,
                    distance_m: p.distance.as_deref().and_then(|d| d.parse().ok()),
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct AmapPoi {
    #[serde(default, deserialize_with = "loose_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    address: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "loose_string")]
    poi_type: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    cityname: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    distance: Option<String>,
}

/// Directions response (driving, walking, bicycling, transit)
#[derive(Debug, Deserialize)]
struct DirectionResponse {
    status: String,
    #[serde(default, deserialize_with = "loose_string")]
    info: Option<String>,
    #[serde(default, deserialize_with = "loose_object")]
    route: Option<AmapRoute>,
}

#[derive(Debug, Deserialize)]
struct AmapRoute {
    #[serde(default)]
    paths: Vec<AmapPath>,
    #[serde(default)]
    transits: Vec<AmapTransit>,
}

impl AmapRoute {
    /// Distance (km), duration (min) and polyline of the first candidate
    fn best(&self, mode: TravelMode) -> std::result::Result<(f64, u64, Vec<Coordinates>), MapError> {
        let no_route = || MapError::Provider("No feasible route found".to_string());

        if matches!(mode, TravelMode::Bus | TravelMode::Train) {
            let transit = self.transits.first().ok_or_else(no_route)?;
            let seconds = transit
                .duration
                .as_deref()
                .or_else(|| transit.cost.as_ref().and_then(|c| c.duration.as_deref()));
            let points = transit
                .segments
                .iter()
                .flat_map(|segment| {
                    let walking = segment
                        .walking
                        .iter()
                        .flat_map(|w| w.steps.iter())
                        .filter_map(|s| s.polyline.as_deref());
                    let bus = segment
                        .bus
                        .iter()
                        .flat_map(|b| b.buslines.iter())
                        .filter_map(|l| l.polyline.as_deref());
                    walking.chain(bus).flat_map(parse_polyline).collect::<Vec<_>>()
                })
                .collect();
            return Ok((
                parse_number(transit.distance.as_deref()) / 1000.0,
                (parse_number(seconds) / 60.0).floor() as u64,
                points,
            ));
        }

        let path = self.paths.first().ok_or_else(no_route)?;
        let points = path
            .steps
            .iter()
            .filter_map(|s| s.polyline.as_deref())
            .flat_map(parse_polyline)
            .collect();
        Ok((
            parse_number(path.distance.as_deref()) / 1000.0,
            (parse_number(path.duration.as_deref()) / 60.0).floor() as u64,
            points,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct AmapPath {
    #[serde(default, deserialize_with = "loose_string")]
    distance: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    duration: Option<String>,
    #[serde(default)]
    steps: Vec<AmapPolyline>,
}

#[derive(Debug, Deserialize)]
struct AmapPolyline {
    #[serde(default, deserialize_with = "loose_string")]
    polyline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AmapTransit {
    #[serde(default, deserialize_with = "loose_string")]
    distance: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    duration: Option<String>,
    #[serde(default, deserialize_with = "loose_object")]
    cost: Option<AmapCost>,
    #[serde(default)]
    segments: Vec<AmapSegment>,
}

#[derive(Debug, Deserialize)]
struct AmapCost {
    #[serde(default, deserialize_with = "loose_string")]
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AmapSegment {
    #[serde(default, deserialize_with = "loose_object")]
    walking: Option<AmapWalking>,
    #[serde(default, deserialize_with = "loose_object")]
    bus: Option<AmapBus>,
}

#[derive(Debug, Deserialize)]
struct AmapWalking {
    #[serde(default)]
    steps: Vec<AmapPolyline>,
}

#[derive(Debug, Deserialize)]
struct AmapBus {
    #[serde(default)]
    buslines: Vec<AmapPolyline>,
}
