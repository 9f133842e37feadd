//! Location descriptor resolution
//!
//! Resolution chain: Cache → literal "lng, lat" → static city table →
//! provider geocoder → default location.
//!
//! Stages that produce real data write to the cache before returning. The
//! default location is never cached, so a transient provider failure is
//! retried on the next call for the same query.

use crate::cache::{CacheSettings, InFlight, ResolutionCache};
use crate::error::MapError;
use crate::geo::gazetteer::StaticGazetteer;
use crate::geo::{Coordinates, LocationQuery, LocationSource, ResolvedLocation};
use crate::provider::MapProvider;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name given to literal coordinate input
pub const LITERAL_COORDINATE_NAME: &str = "指定坐标位置";

/// Resolves free-form location descriptors to coordinates
pub struct GeocodeResolver<P> {
    provider: Arc<P>,
    gazetteer: StaticGazetteer,
    cache: ResolutionCache<String, ResolvedLocation>,
    inflight: InFlight<String, Result<ResolvedLocation, MapError>>,
}

impl<P: MapProvider> GeocodeResolver<P> {
    pub fn new(provider: Arc<P>, gazetteer: StaticGazetteer, cache: CacheSettings) -> Self {
        Self {
            provider,
            gazetteer,
            cache: ResolutionCache::new(cache),
            inflight: InFlight::new(),
        }
    }

    /// Resolve a descriptor, falling back to the default location on any
    /// failure
    pub async fn resolve(&self, query: &str) -> ResolvedLocation {
        match self.try_resolve(query).await {
            Ok(location) => location,
            Err(err) => {
                warn!(query, "Geocoding failed, using default location: {}", err);
                ResolvedLocation::default_fallback()
            }
        }
    }

    /// Resolve a descriptor, surfacing the failure instead of the default
    pub async fn try_resolve(&self, query: &str) -> Result<ResolvedLocation, MapError> {
        let query = LocationQuery::parse(query)?;
        let key = query.as_str().to_string();

        // 1. Cache
        if let Some(location) = self.cache.get(&key).await {
            debug!(query = %key, "Geocode cache hit");
            return Ok(location);
        }

        // 2. Literal coordinates, 3. static city table
        let local = match Coordinates::parse_pair(&key) {
            Ok(coordinates) => Some(literal_location(coordinates)),
            Err(_) => self.city_location(&key),
        };
        if let Some(location) = local {
            debug!(query = %key, source = %location.source, "Resolved locally");
            self.cache.put(key, location.clone()).await;
            return Ok(location);
        }

        // 4. Provider, shared by concurrent callers for the same query
        let remote_key = key.clone();
        self.inflight
            .run(key, || async move { self.resolve_remote(remote_key).await })
            .await
    }

    /// Number of memoized queries
    pub async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }

    fn city_location(&self, query: &str) -> Option<ResolvedLocation> {
        let (city, coordinates) = self.gazetteer.city(query)?;
        Some(ResolvedLocation {
            coordinates,
            formatted_address: format!("{}市", city),
            name: city.to_string(),
            province: None,
            city: Some(city.to_string()),
            district: None,
            source: LocationSource::Gazetteer,
        })
    }

    async fn resolve_remote(&self, key: String) -> Result<ResolvedLocation, MapError> {
        let candidate = self
            .provider
            .geocode(&key)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MapError::Provider(format!("No geocode result for '{}'", key)))?;

        let location = ResolvedLocation {
            coordinates: Coordinates::parse_pair(&candidate.location)?,
            formatted_address: candidate.formatted_address.unwrap_or_else(|| key.clone()),
            name: key.clone(),
            province: candidate.province,
            city: candidate.city,
            district: candidate.district,
            source: LocationSource::Provider,
        };

        debug!(query = %key, provider = self.provider.name(), "Resolved by provider");
        self.cache.put(key, location.clone()).await;
        Ok(location)
    }
}

fn literal_location(coordinates: Coordinates) -> ResolvedLocation {
    ResolvedLocation {
        coordinates,
        formatted_address: format!("坐标: {:.6}, {:.6}", coordinates.lng, coordinates.lat),
        name: LITERAL_COORDINATE_NAME.to_string(),
        province: None,
        city: None,
        district: None,
        source: LocationSource::Coordinate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::FakeProvider;
    use std::time::Duration;

    fn build(provider: FakeProvider) -> (GeocodeResolver<FakeProvider>, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        let resolver = GeocodeResolver::new(
            provider.clone(),
            StaticGazetteer::new(),
            CacheSettings::unbounded(),
        );
        (resolver, provider)
    }

    #[tokio::test]
    async fn test_literal_coordinates() {
        let (resolver, provider) = build(FakeProvider::offline());

        let loc = resolver.resolve("121.473701, 31.230416").await;
        assert_eq!(loc.coordinates, Coordinates::new(121.473701, 31.230416));
        assert_eq!(loc.source, LocationSource::Coordinate);
        assert_eq!(loc.name, "指定坐标位置");
        assert_eq!(loc.formatted_address, "坐标: 121.473701, 31.230416");

        let loc = resolver.resolve("-0.1276,51.5072").await;
        assert_eq!(loc.coordinates, Coordinates::new(-0.1276, 51.5072));

        assert_eq!(provider.geocode_calls(), 0);
    }

    #[tokio::test]
    async fn test_city_stage_and_cache() {
        let (resolver, provider) = build(FakeProvider::offline());

        let loc = resolver.resolve("北京").await;
        assert_eq!(loc.coordinates, Coordinates::new(116.397428, 39.90923));
        assert_eq!(loc.city.as_deref(), Some("北京"));
        assert_eq!(loc.source, LocationSource::Gazetteer);
        assert_eq!(resolver.cached_entries().await, 1);

        let again = resolver.resolve("北京").await;
        assert_eq!(again, loc);
        assert_eq!(provider.geocode_calls(), 0);
    }

    #[tokio::test]
    async fn test_city_with_admin_suffix() {
        let (resolver, _) = build(FakeProvider::offline());
        let loc = resolver.resolve("上海市").await;
        assert_eq!(loc.name, "上海");
        assert_eq!(loc.formatted_address, "上海市");
        assert_eq!(loc.coordinates, Coordinates::new(121.473701, 31.230416));
    }

    #[tokio::test]
    async fn test_provider_stage_is_cached() {
        let (resolver, provider) = build(
            FakeProvider::default().with_geocode("阜通东大街6号", "116.482086,39.990496"),
        );

        let loc = resolver.resolve("阜通东大街6号").await;
        assert_eq!(loc.coordinates, Coordinates::new(116.482086, 39.990496));
        assert_eq!(loc.source, LocationSource::Provider);
        assert_eq!(loc.name, "阜通东大街6号");
        assert_eq!(loc.formatted_address, "阜通东大街6号(provider)");
        assert_eq!(loc.province.as_deref(), Some("测试省"));
        assert_eq!(loc.district.as_deref(), Some("测试区"));

        let again = resolver.resolve("  阜通东大街6号 ").await;
        assert_eq!(again, loc);
        assert_eq!(provider.geocode_calls(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_uncached() {
        let (resolver, provider) = build(FakeProvider::offline());

        let loc = resolver.resolve("某个不存在的地方").await;
        assert!(loc.is_fallback());
        assert_eq!(loc.coordinates, Coordinates::new(116.397428, 39.90923));
        assert_eq!(resolver.cached_entries().await, 0);

        // the fallback is not memoized, so the provider is asked again
        resolver.resolve("某个不存在的地方").await;
        assert_eq!(provider.geocode_calls(), 2);
    }

    #[tokio::test]
    async fn test_strict_mode_surfaces_errors() {
        let (resolver, _) = build(FakeProvider::offline());
        let err = resolver.try_resolve("某个不存在的地方").await.unwrap_err();
        assert!(matches!(err, MapError::Network(_)));

        let (resolver, _) = build(FakeProvider::default());
        let err = resolver.try_resolve("无结果").await.unwrap_err();
        assert!(matches!(err, MapError::Provider(_)));
    }

    #[tokio::test]
    async fn test_malformed_provider_location_falls_back() {
        let (resolver, _) = build(FakeProvider::default().with_geocode("坏坐标", "abc,def"));
        assert!(matches!(
            resolver.try_resolve("坏坐标").await,
            Err(MapError::Parse(_))
        ));
        assert!(resolver.resolve("坏坐标").await.is_fallback());
    }

    #[tokio::test]
    async fn test_out_of_range_pair_falls_through_to_provider() {
        let (resolver, provider) = build(FakeProvider::offline());
        let loc = resolver.resolve("200.5, 10.0").await;
        assert!(loc.is_fallback());
        assert_eq!(provider.geocode_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_query() {
        let (resolver, provider) = build(FakeProvider::default());
        assert!(resolver.resolve("   ").await.is_fallback());
        assert!(matches!(
            resolver.try_resolve("").await,
            Err(MapError::Validation(_))
        ));
        assert_eq!(provider.geocode_calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_identical_queries_share_one_call() {
        let (resolver, provider) = build(
            FakeProvider::default()
                .with_geocode("西直门", "116.355,39.940")
                .with_delay(Duration::from_millis(50)),
        );

        let (a, b, c) = tokio::join!(
            resolver.resolve("西直门"),
            resolver.resolve("西直门"),
            resolver.resolve("西直门")
        );
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(provider.geocode_calls(), 1);
    }

    #[tokio::test]
    async fn test_bounded_cache_evicts() {
        let provider = Arc::new(FakeProvider::offline());
        let resolver = GeocodeResolver::new(
            provider,
            StaticGazetteer::new(),
            CacheSettings {
                max_entries: Some(2),
                ttl: None,
            },
        );
        resolver.resolve("北京").await;
        resolver.resolve("上海").await;
        resolver.resolve("广州").await;
        assert_eq!(resolver.cached_entries().await, 2);
    }
}
