//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::config::defaults::DEFAULT_NEARBY_RADIUS;
use crate::error::{Error, MapError};
use crate::format::{available_formats, FormatInfo};
use crate::geo::{Coordinates, PlaceResult, ResolvedLocation};
use crate::provider::MapProvider;
use crate::server::state::AppState;
use crate::service::route::{RouteRequest, RouteResult, RouteStyle, TravelMode};
use crate::service::DistanceReport;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Create the API router
pub fn create_router<P: MapProvider>(state: Arc<AppState<P>>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler::<P>))
        .route("/api/geocode", get(geocode_handler::<P>))
        .route("/api/search", get(search_handler::<P>))
        .route("/api/nearby", get(nearby_handler::<P>))
        .route("/api/distance", get(distance_handler::<P>))
        .route("/api/route", get(route_handler::<P>))
        .route("/api/modes", get(modes_handler))
        .route("/api/formats", get(formats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<MapError> for ApiError {
    fn from(err: MapError) -> Self {
        ApiError {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Map(err) => err.into(),
            err => {
                let code = match &err {
                    Error::Config(_) => "CONFIG_ERROR",
                    _ => "INTERNAL_ERROR",
                };
                ApiError {
                    error: err.to_string(),
                    code: code.to_string(),
                }
            }
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Mapping provider in use
    pub provider: String,
    /// Whether resolution failures are reported by default
    pub strict: bool,
    /// Memoized geocode queries
    pub geocode_cache: usize,
    /// Memoized searches
    pub search_cache: usize,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<P: MapProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<StatusResponse> {
    let service = state.service();
    let (geocode_cache, search_cache) = service.cache_sizes().await;

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: service.provider_name().to_string(),
        strict: service.is_strict(),
        geocode_cache,
        search_cache,
        uptime_secs: state.uptime_secs(),
    })
}

#[derive(Debug, Deserialize)]
pub struct GeocodeParams {
    #[serde(default)]
    pub q: String,
    pub strict: Option<bool>,
}

/// Resolve a location descriptor
///
/// GET /api/geocode?q=
async fn geocode_handler<P: MapProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<ResolvedLocation>, ApiError> {
    let location = state.service().locate(&params.q, params.strict).await?;
    Ok(Json(location))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub city: String,
    pub strict: Option<bool>,
}

/// Place list response
#[derive(Debug, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub count: usize,
    pub places: Vec<PlaceResult>,
}

impl From<Vec<PlaceResult>> for PlacesResponse {
    fn from(places: Vec<PlaceResult>) -> Self {
        Self {
            count: places.len(),
            places,
        }
    }
}

/// Keyword place search
///
/// GET /api/search?keyword=&city=
async fn search_handler<P: MapProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let places = state
        .service()
        .find_places(&params.keyword, &params.city, params.strict)
        .await?;
    Ok(Json(places.into()))
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub location: String,
    #[serde(default)]
    pub keyword: String,
    pub radius: Option<u32>,
}

/// POIs around a coordinate
///
/// GET /api/nearby?location=lng,lat&keyword=&radius=
async fn nearby_handler<P: MapProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let center = Coordinates::parse_pair(&params.location)?;
    let places = state
        .service()
        .places()
        .search_nearby(
            center,
            &params.keyword,
            params.radius.unwrap_or(DEFAULT_NEARBY_RADIUS),
        )
        .await;
    Ok(Json(places.into()))
}

#[derive(Debug, Deserialize)]
pub struct DistanceParams {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    pub strict: Option<bool>,
}

/// Great-circle distance between two descriptors
///
/// GET /api/distance?from=&to=
async fn distance_handler<P: MapProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): Query<DistanceParams>,
) -> Result<Json<DistanceReport>, ApiError> {
    let report = state
        .service()
        .distance_between(&params.from, &params.to, params.strict)
        .await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    pub mode: Option<String>,
}

/// Route response: the planning outcome plus how to draw it
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    #[serde(flatten)]
    pub result: RouteResult,
    pub style: RouteStyle,
}

/// Plan a route
///
/// GET /api/route?origin=&destination=&mode=
///
/// Planning failures are reported with `success: false`. An unknown mode,
/// requested or configured, is rejected outright.
async fn route_handler<P: MapProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(params): Query<RouteParams>,
) -> Result<Json<RouteResponse>, ApiError> {
    let mode = match params.mode.as_deref() {
        Some(mode) => mode
            .parse::<TravelMode>()
            .map_err(|e| ApiError::from(MapError::Validation(e)))?,
        None => state
            .config
            .defaults
            .mode
            .parse::<TravelMode>()
            .map_err(|e| ApiError::from(Error::Config(e)))?,
    };

    let request = RouteRequest::new(params.origin, params.destination, mode);
    let result = state.service().planner().plan_route(&request).await;

    Ok(Json(RouteResponse {
        result,
        style: mode.style(),
    }))
}

/// Travel mode description
#[derive(Debug, Serialize, Deserialize)]
pub struct ModeInfo {
    pub name: String,
    pub label: String,
    pub stroke_color: String,
    pub dashed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModesResponse {
    pub modes: Vec<ModeInfo>,
}

/// List travel modes with their styling
///
/// GET /api/modes
async fn modes_handler() -> Json<ModesResponse> {
    let modes = TravelMode::all()
        .into_iter()
        .map(|mode| {
            let style = mode.style();
            ModeInfo {
                name: mode.to_string(),
                label: mode.label().to_string(),
                stroke_color: style.stroke_color.to_string(),
                dashed: style.dashed,
            }
        })
        .collect();

    Json(ModesResponse { modes })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}
