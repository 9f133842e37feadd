//! Location services
//!
//! `MapService` bundles the geocode resolver, place search and route planner
//! around one shared provider. It is built explicitly from a provider and a
//! `Config`; callers own it (usually behind an `Arc`) rather than reaching
//! for a process-wide instance.

pub mod geocode;
pub mod route;
pub mod search;

pub use geocode::GeocodeResolver;
pub use route::{RoutePlanner, RouteRequest, RouteResult, TravelMode};
pub use search::PlaceSearchService;

use crate::config::Config;
use crate::constants::geo::NATIONWIDE;
use crate::error::{MapError, Result};
use crate::geo::gazetteer::StaticGazetteer;
use crate::geo::{distance, LocationQuery, PlaceResult, ResolvedLocation};
use crate::provider::{AmapClient, MapProvider};
use serde::Serialize;
use std::sync::Arc;

/// Great-circle distance between two resolved descriptors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceReport {
    pub from: ResolvedLocation,
    pub to: ResolvedLocation,
    pub distance_km: f64,
}

/// Geocoding, search and routing over one provider
pub struct MapService<P> {
    provider: Arc<P>,
    geocoder: GeocodeResolver<P>,
    places: PlaceSearchService<P>,
    planner: RoutePlanner<P>,
    strict: bool,
}

impl MapService<AmapClient> {
    /// Build the service against AMap using the `[provider]` section
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = AmapClient::from_config(&config.provider)?;
        Ok(Self::new(Arc::new(client), config))
    }
}

impl<P: MapProvider> MapService<P> {
    pub fn new(provider: Arc<P>, config: &Config) -> Self {
        let settings = config.cache_settings();
        let gazetteer = StaticGazetteer::new();
        Self {
            geocoder: GeocodeResolver::new(provider.clone(), gazetteer.clone(), settings),
            places: PlaceSearchService::new(provider.clone(), gazetteer, settings)
                .with_default_scope(config.search.default_city.clone()),
            planner: RoutePlanner::new(provider.clone()),
            strict: config.resolver.strict,
            provider,
        }
    }

    pub fn geocoder(&self) -> &GeocodeResolver<P> {
        &self.geocoder
    }

    pub fn places(&self) -> &PlaceSearchService<P> {
        &self.places
    }

    pub fn planner(&self) -> &RoutePlanner<P> {
        &self.planner
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Whether resolution failures are reported instead of defaulted
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Resolve a descriptor, honouring `strict` (or the configured default)
    ///
    /// Blank input is rejected in either mode.
    pub async fn locate(
        &self,
        query: &str,
        strict: Option<bool>,
    ) -> std::result::Result<ResolvedLocation, MapError> {
        let query = LocationQuery::parse(query)?;
        let query = query.as_str();
        if strict.unwrap_or(self.strict) {
            self.geocoder.try_resolve(query).await
        } else {
            Ok(self.geocoder.resolve(query).await)
        }
    }

    /// Keyword search, honouring `strict` like `locate`
    pub async fn find_places(
        &self,
        keyword: &str,
        city: &str,
        strict: Option<bool>,
    ) -> std::result::Result<Vec<PlaceResult>, MapError> {
        if keyword.trim().is_empty() {
            return Err(MapError::Validation("search keyword is empty".to_string()));
        }
        if strict.unwrap_or(self.strict) {
            self.places.try_search_places(keyword, city).await
        } else {
            Ok(self.places.search_places(keyword, city).await)
        }
    }

    /// Keyword search across the whole country, honouring `strict`
    pub async fn find_places_nationwide(
        &self,
        keyword: &str,
        strict: Option<bool>,
    ) -> std::result::Result<Vec<PlaceResult>, MapError> {
        if keyword.trim().is_empty() {
            return Err(MapError::Validation("search keyword is empty".to_string()));
        }
        if strict.unwrap_or(self.strict) {
            self.places.try_search_places(keyword, NATIONWIDE).await
        } else {
            Ok(self.places.search_places_nationwide(keyword).await)
        }
    }

    /// Resolve both descriptors and measure the distance between them
    pub async fn distance_between(
        &self,
        from: &str,
        to: &str,
        strict: Option<bool>,
    ) -> std::result::Result<DistanceReport, MapError> {
        LocationQuery::parse(from)?;
        LocationQuery::parse(to)?;
        let (from, to) = tokio::join!(self.locate(from, strict), self.locate(to, strict));
        let (from, to) = (from?, to?);
        let distance_km = distance::distance_km(
            from.coordinates.lng,
            from.coordinates.lat,
            to.coordinates.lng,
            to.coordinates.lat,
        );
        Ok(DistanceReport {
            from,
            to,
            distance_km,
        })
    }

    /// (geocode, search) cache sizes
    pub async fn cache_sizes(&self) -> (usize, usize) {
        (
            self.geocoder.cached_entries().await,
            self.places.cached_entries().await,
        )
    }
}
