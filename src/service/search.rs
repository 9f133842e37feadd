//! Place search
//!
//! Keyword search scoped to a city, backed by the static landmark table and
//! the provider's POI search. Results are memoized per (keyword, scope). When
//! both sources come up empty, callers of the lenient entry point get a
//! single synthetic hit named after the keyword; that hit is never cached.

use crate::cache::{CacheSettings, InFlight, ResolutionCache};
use crate::constants::geo::NATIONWIDE;
use crate::error::MapError;
use crate::geo::gazetteer::StaticGazetteer;
use crate::geo::{Coordinates, PlaceResult, LANDMARK_PLACE_TYPE};
use crate::provider::{MapProvider, Poi};
use std::sync::Arc;
use tracing::{debug, warn};

type SearchKey = (String, String);

/// Keyword search over landmarks and provider POIs
pub struct PlaceSearchService<P> {
    provider: Arc<P>,
    gazetteer: StaticGazetteer,
    default_scope: String,
    cache: ResolutionCache<SearchKey, Vec<PlaceResult>>,
    inflight: InFlight<SearchKey, Result<Vec<PlaceResult>, MapError>>,
}

impl<P: MapProvider> PlaceSearchService<P> {
    pub fn new(provider: Arc<P>, gazetteer: StaticGazetteer, cache: CacheSettings) -> Self {
        Self {
            provider,
            gazetteer,
            default_scope: NATIONWIDE.to_string(),
            cache: ResolutionCache::new(cache),
            inflight: InFlight::new(),
        }
    }

    /// Scope used when a search names no city
    pub fn with_default_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        if !scope.trim().is_empty() {
            self.default_scope = scope.trim().to_string();
        }
        self
    }

    pub fn default_scope(&self) -> &str {
        &self.default_scope
    }

    /// Search across the whole country, ignoring the configured scope
    pub async fn search_places_nationwide(&self, keyword: &str) -> Vec<PlaceResult> {
        self.search_places(keyword, NATIONWIDE).await
    }

    /// Search within `city`, returning the synthetic hit on any failure
    ///
    /// An empty `city` means the default scope.
    pub async fn search_places(&self, keyword: &str, city: &str) -> Vec<PlaceResult> {
        match self.try_search_places(keyword, city).await {
            Ok(places) => places,
            Err(err) => {
                warn!(keyword, city, "Place search failed, using placeholder: {}", err);
                vec![PlaceResult::synthetic(keyword.trim())]
            }
        }
    }

    /// Search within `city`, surfacing the failure
    pub async fn try_search_places(
        &self,
        keyword: &str,
        city: &str,
    ) -> Result<Vec<PlaceResult>, MapError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(MapError::Validation("keyword must not be empty".to_string()));
        }
        let scope = match city.trim() {
            "" => self.default_scope.as_str(),
            city => city,
        };
        let key = (keyword.to_string(), scope.to_string());

        if let Some(places) = self.cache.get(&key).await {
            debug!(keyword, scope, "Search cache hit");
            return Ok(places);
        }

        if let Some(landmark) = self.gazetteer.landmark(keyword) {
            debug!(keyword, landmark = landmark.name, "Matched static landmark");
            let places = vec![PlaceResult {
                id: landmark.name.to_string(),
                name: landmark.name.to_string(),
                coordinates: landmark.coordinates,
                address: format!("{}位置", landmark.name),
                place_type: LANDMARK_PLACE_TYPE.to_string(),
                city: landmark.city.to_string(),
                distance_m: None,
            }];
            self.cache.put(key, places.clone()).await;
            return Ok(places);
        }

        let remote_key = key.clone();
        self.inflight
            .run(key, || async move { self.search_remote(remote_key).await })
            .await
    }

    /// POIs around `center`, nearest first as ordered by the provider
    ///
    /// Returns an empty list on failure. Not cached.
    pub async fn search_nearby(
        &self,
        center: Coordinates,
        keyword: &str,
        radius_m: u32,
    ) -> Vec<PlaceResult> {
        match self.try_search_nearby(center, keyword, radius_m).await {
            Ok(places) => places,
            Err(err) => {
                warn!(%center, keyword, radius_m, "Nearby search failed: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn try_search_nearby(
        &self,
        center: Coordinates,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<PlaceResult>, MapError> {
        center.validate()?;
        if radius_m == 0 {
            return Err(MapError::Validation("radius must be positive".to_string()));
        }
        let pois = self
            .provider
            .search_around(center, keyword.trim(), radius_m)
            .await?;
        Ok(convert_pois(pois, ""))
    }

    /// Number of memoized searches
    pub async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }

    async fn search_remote(&self, key: SearchKey) -> Result<Vec<PlaceResult>, MapError> {
        let (keyword, scope) = &key;
        let pois = self.provider.search_text(keyword, scope).await?;
        let places = convert_pois(pois, scope);
        if places.is_empty() {
            return Err(MapError::Provider(format!(
                "No places found for '{}' in {}",
                keyword, scope
            )));
        }

        debug!(keyword = %keyword, scope = %scope, count = places.len(), "Provider search");
        self.cache.put(key, places.clone()).await;
        Ok(places)
    }
}

/// Map provider POIs to results, in order, dropping unparseable locations
fn convert_pois(pois: Vec<Poi>, scope: &str) -> Vec<PlaceResult> {
    pois.into_iter()
        .filter_map(|poi| {
            let coordinates = match Coordinates::parse_pair(&poi.location) {
                Ok(c) => c,
                Err(err) => {
                    debug!(id = %poi.id, "Skipping POI: {}", err);
                    return None;
                }
            };
            Some(PlaceResult {
                id: poi.id,
                name: poi.name,
                coordinates,
                address: poi.address.unwrap_or_default(),
                place_type: poi.poi_type.unwrap_or_default(),
                city: poi.city.unwrap_or_else(|| scope.to_string()),
                distance_m: poi.distance_m,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::SYNTHETIC_PLACE_TYPE;
    use crate::provider::testing::{poi, FakeProvider};
    use std::time::Duration;

    fn build(provider: FakeProvider) -> (PlaceSearchService<FakeProvider>, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        let service = PlaceSearchService::new(
            provider.clone(),
            StaticGazetteer::new(),
            CacheSettings::unbounded(),
        );
        (service, provider)
    }

    #[tokio::test]
    async fn test_landmark_hit() {
        let (service, provider) = build(FakeProvider::offline());

        let places = service.search_places("故宫", "").await;
        assert_eq!(places.len(), 1);
        let place = &places[0];
        assert_eq!(place.id, "故宫");
        assert_eq!(place.name, "故宫");
        assert_eq!(place.coordinates, Coordinates::new(116.397026, 39.918058));
        assert_eq!(place.address, "故宫位置");
        assert_eq!(place.place_type, "景点");
        assert_eq!(place.city, "北京");
        assert_eq!(provider.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_landmark_substring_match() {
        let (service, _) = build(FakeProvider::offline());
        let places = service.search_places("杭州西湖景区", "杭州").await;
        assert_eq!(places[0].name, "西湖");
        assert_eq!(places[0].city, "杭州");
    }

    #[tokio::test]
    async fn test_provider_results_keep_order_and_skip_bad_locations() {
        let mut missing = poi("B003", "无坐标", "");
        missing.location = "not a pair".to_string();
        let mut bare = poi("B004", "朝阳公园东门", "116.48,39.94");
        bare.city = None;
        bare.address = None;
        bare.poi_type = None;

        let (service, provider) = build(FakeProvider::default().with_pois(
            "朝阳公园",
            vec![
                poi("B001", "朝阳公园", "116.478,39.944"),
                poi("B002", "朝阳公园南门", "116.475,39.932"),
                missing,
                bare,
            ],
        ));

        let places = service.search_places("朝阳公园", "北京").await;
        let ids: Vec<_> = places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["B001", "B002", "B004"]);
        assert_eq!(places[0].address, "朝阳公园地址");
        assert_eq!(places[0].city, "北京市");
        // missing fields fall back to the requested scope / empty strings
        assert_eq!(places[2].city, "北京");
        assert_eq!(places[2].address, "");
        assert_eq!(places[2].place_type, "");

        service.search_places("朝阳公园", "北京").await;
        assert_eq!(provider.search_calls(), 1);
        assert_eq!(service.cached_entries().await, 1);
    }

    #[tokio::test]
    async fn test_scope_is_part_of_the_key() {
        let (service, provider) = build(
            FakeProvider::default().with_pois("咖啡", vec![poi("C1", "咖啡馆", "120.1,30.2")]),
        );
        service.search_places("咖啡", "杭州").await;
        service.search_places("咖啡", "苏州").await;
        service.search_places("咖啡", "").await;
        assert_eq!(provider.search_calls(), 3);
        assert_eq!(service.cached_entries().await, 3);
    }

    #[tokio::test]
    async fn test_offline_returns_synthetic_uncached() {
        let (service, provider) = build(FakeProvider::offline());

        let places = service.search_places("不存在的地方xyz", "").await;
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, "1");
        assert_eq!(places[0].name, "不存在的地方xyz");
        assert_eq!(places[0].place_type, SYNTHETIC_PLACE_TYPE);
        assert_eq!(places[0].coordinates, Coordinates::new(116.397428, 39.90923));
        assert_eq!(service.cached_entries().await, 0);

        service.search_places("不存在的地方xyz", "").await;
        assert_eq!(provider.search_calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_provider_result_is_an_error() {
        let (service, _) = build(FakeProvider::default());
        assert!(matches!(
            service.try_search_places("无结果关键词", "上海").await,
            Err(MapError::Provider(_))
        ));
        let places = service.search_places("无结果关键词", "上海").await;
        assert_eq!(places[0].place_type, SYNTHETIC_PLACE_TYPE);
    }

    #[tokio::test]
    async fn test_empty_keyword() {
        let (service, provider) = build(FakeProvider::default());
        assert!(matches!(
            service.try_search_places("  ", "北京").await,
            Err(MapError::Validation(_))
        ));
        assert_eq!(provider.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_default_scope() {
        let (service, _) = build(FakeProvider::default());
        assert_eq!(service.default_scope(), "全国");
        let service = service.with_default_scope(" 上海 ");
        assert_eq!(service.default_scope(), "上海");
        let service = service.with_default_scope("");
        assert_eq!(service.default_scope(), "上海");
    }

    #[tokio::test]
    async fn test_nationwide_ignores_default_scope() {
        let mut bare = poi("R1", "Rust Cafe", "116.3,39.9");
        bare.city = None;
        let (service, provider) = build(FakeProvider::default().with_pois("rust", vec![bare]));
        let service = service.with_default_scope("上海");

        let places = service.search_places_nationwide("rust").await;
        assert_eq!(places[0].city, "全国");

        let places = service.search_places("rust", "").await;
        assert_eq!(places[0].city, "上海");
        assert_eq!(provider.search_calls(), 2);
        assert_eq!(service.cached_entries().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_searches_share_one_call() {
        let (service, provider) = build(
            FakeProvider::default()
                .with_pois("书店", vec![poi("S1", "书店", "116.3,39.9")])
                .with_delay(Duration::from_millis(50)),
        );
        let (a, b) = tokio::join!(
            service.search_places("书店", "北京"),
            service.search_places("书店", "北京")
        );
        assert_eq!(a, b);
        assert_eq!(provider.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_nearby() {
        let mut near = poi("N1", "便利店", "116.40,39.91");
        near.distance_m = Some(85.0);
        near.city = None;
        let (service, provider) =
            build(FakeProvider::default().with_pois("便利店", vec![near]));

        let center = Coordinates::new(116.397428, 39.90923);
        let places = service.search_nearby(center, "便利店", 1000).await;
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].distance_m, Some(85.0));
        assert_eq!(places[0].city, "");
        assert_eq!(provider.around_calls(), 1);

        assert!(service.search_nearby(center, "便利店", 0).await.is_empty());
        assert!(service
            .search_nearby(Coordinates::new(200.0, 0.0), "便利店", 500)
            .await
            .is_empty());
        assert_eq!(provider.around_calls(), 1);
    }

    #[tokio::test]
    async fn test_nearby_offline_is_empty() {
        let (service, _) = build(FakeProvider::offline());
        let places = service
            .search_nearby(Coordinates::new(116.4, 39.9), "餐厅", 500)
            .await;
        assert!(places.is_empty());
    }
}
