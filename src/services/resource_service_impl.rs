use super::cache::{CacheCoordinator, LookupError};
use super::location_service::LocationService;
use super::resource_service::ResourceService;
use crate::clients::{ProviderError, ProviderQuery, ResourceProvider};
use crate::config::CacheConfig;
use crate::db::RecordStore;
use crate::domain::{LocationId, ResourceKind, StoredRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub struct CachedResourceService {
    store: Arc<dyn RecordStore>,
    coordinator: Arc<CacheCoordinator>,
    locations: Arc<dyn LocationService>,
    providers: HashMap<ResourceKind, Arc<dyn ResourceProvider>>,
    ttls: CacheConfig,
}

impl CachedResourceService {
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        coordinator: Arc<CacheCoordinator>,
        locations: Arc<dyn LocationService>,
        ttls: CacheConfig,
    ) -> Self {
        Self {
            store,
            coordinator,
            locations,
            providers: HashMap::new(),
            ttls,
        }
    }

    /// Registers the provider for its kind, replacing any earlier one.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    fn provider(&self, kind: ResourceKind) -> Result<Arc<dyn ResourceProvider>, ProviderError> {
        self.providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| ProviderError::unavailable("registry", format!("no provider for {kind}")))
    }
}

#[async_trait::async_trait]
impl ResourceService for CachedResourceService {
    async fn fetch(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> Result<Vec<StoredRecord>, LookupError> {
        let location = self.locations.get(location_id).await?;
        let provider = self.provider(kind)?;
        let query = ProviderQuery {
            search_query: location.search_query,
            latitude: location.latitude,
            longitude: location.longitude,
        };

        self.coordinator
            .resolve(kind, location_id, self.ttls.ttl_for(kind), || async move {
                provider.fetch(&query).await.inspect_err(|e| {
                    warn!(%kind, %location_id, error = %e, "Provider refresh failed");
                })
            })
            .await
    }

    async fn purge(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> Result<u64, LookupError> {
        let deleted = self.store.delete_by_location(kind, location_id).await?;
        info!(%kind, %location_id, deleted, "Purged cached batch");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::Geocoder;
    use crate::db::Store;
    use crate::domain::clock::ManualClock;
    use crate::domain::{NewLocation, ResourceRecord, Trail};
    use crate::services::DefaultLocationService;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const T0: i64 = 1_800_000_000_000;

    struct NoGeocoder;

    #[async_trait]
    impl Geocoder for NoGeocoder {
        async fn geocode(&self, _query: &str) -> Result<NewLocation, ProviderError> {
            Err(ProviderError::unavailable("geocode", "not used"))
        }
    }

    /// Returns two trails and remembers the query it was asked about.
    #[derive(Default)]
    struct FakeTrails {
        calls: AtomicUsize,
        last_query: std::sync::Mutex<Option<ProviderQuery>>,
    }

    #[async_trait]
    impl ResourceProvider for FakeTrails {
        fn kind(&self) -> ResourceKind {
            ResourceKind::Trail
        }

        async fn fetch(
            &self,
            query: &ProviderQuery,
        ) -> Result<Vec<ResourceRecord>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.clone());
            Ok(["Rattlesnake Ledge", "Mount Si"]
                .into_iter()
                .map(|name| {
                    Trail {
                        name: name.to_string(),
                        location: "North Bend, Washington".to_string(),
                        length: Some(4.0),
                        stars: Some(4.5),
                        star_votes: Some(120),
                        summary: String::new(),
                        trail_url: "https://example.com/trail".to_string(),
                        conditions: None,
                        condition_date: None,
                        condition_time: None,
                    }
                    .into()
                })
                .collect())
        }
    }

    struct Fixture {
        service: CachedResourceService,
        trails: Arc<FakeTrails>,
        clock: Arc<ManualClock>,
        store: Store,
        location: LocationId,
    }

    async fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::at_millis(T0));
        let store = Store::new("sqlite::memory:")
            .await
            .unwrap()
            .with_clock(clock.clone());
        let location = store
            .insert_location(
                "seattle",
                NewLocation {
                    formatted_query: "Seattle, WA, USA".to_string(),
                    latitude: 47.6,
                    longitude: -122.3,
                },
            )
            .await
            .unwrap()
            .id;

        let shared: Arc<dyn RecordStore> = Arc::new(store.clone());
        let trails = Arc::new(FakeTrails::default());
        let service = CachedResourceService::new(
            shared.clone(),
            Arc::new(CacheCoordinator::new(shared.clone(), clock.clone())),
            Arc::new(DefaultLocationService::new(shared, Arc::new(NoGeocoder))),
            CacheConfig::default(),
        )
        .with_provider(trails.clone());

        Fixture {
            service,
            trails,
            clock,
            store,
            location,
        }
    }

    #[tokio::test]
    async fn fetch_queries_provider_with_stored_location() {
        let f = fixture().await;

        let rows = f.service.fetch(ResourceKind::Trail, f.location).await.unwrap();

        assert_eq!(rows.len(), 2);
        let query = f.trails.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.search_query, "seattle");
        assert!((query.latitude - 47.6).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn fetch_uses_configured_ttl() {
        let f = fixture().await;

        f.service.fetch(ResourceKind::Trail, f.location).await.unwrap();
        f.clock.advance_millis(59 * 60 * 1000);
        f.service.fetch(ResourceKind::Trail, f.location).await.unwrap();
        assert_eq!(f.trails.calls.load(Ordering::SeqCst), 1);

        f.clock.advance_millis(2 * 60 * 1000);
        f.service.fetch(ResourceKind::Trail, f.location).await.unwrap();
        assert_eq!(f.trails.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fetch_unknown_location_is_not_found() {
        let f = fixture().await;

        let err = f
            .service
            .fetch(ResourceKind::Trail, LocationId::new(99))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::LocationNotFound(_)));
        assert_eq!(f.trails.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_without_registered_provider_fails() {
        let f = fixture().await;

        let err = f
            .service
            .fetch(ResourceKind::Weather, f.location)
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Provider(_)));
    }

    #[tokio::test]
    async fn purge_forces_next_fetch_to_refresh() {
        let f = fixture().await;
        f.service.fetch(ResourceKind::Trail, f.location).await.unwrap();

        let deleted = f.service.purge(ResourceKind::Trail, f.location).await.unwrap();
        assert_eq!(deleted, 2);
        assert!(
            f.store
                .find_by_location(ResourceKind::Trail, f.location)
                .await
                .unwrap()
                .is_empty()
        );

        f.service.fetch(ResourceKind::Trail, f.location).await.unwrap();
        assert_eq!(f.trails.calls.load(Ordering::SeqCst), 2);
    }
}
