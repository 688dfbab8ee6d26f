use super::cache::LookupError;
use super::location_service::LocationService;
use crate::clients::Geocoder;
use crate::db::RecordStore;
use crate::domain::{Location, LocationId};
use std::sync::Arc;
use tracing::{debug, info};

pub struct DefaultLocationService {
    store: Arc<dyn RecordStore>,
    geocoder: Arc<dyn Geocoder>,
}

impl DefaultLocationService {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { store, geocoder }
    }
}

#[async_trait::async_trait]
impl LocationService for DefaultLocationService {
    async fn resolve(&self, query: &str) -> Result<Location, LookupError> {
        if let Some(existing) = self.store.find_location_by_query(query).await? {
            debug!(query, location_id = %existing.id, "Location cache hit");
            return Ok(existing);
        }

        let fields = self.geocoder.geocode(query).await?;

        // A concurrent request may have stored the same query meanwhile; the
        // insert then returns that row.
        let location = self.store.insert_location(query, fields).await?;
        info!(
            query,
            location_id = %location.id,
            formatted = %location.formatted_query,
            "Stored new location"
        );
        Ok(location)
    }

    async fn get(&self, id: LocationId) -> Result<Location, LookupError> {
        self.store
            .find_location(id)
            .await?
            .ok_or(LookupError::LocationNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ProviderError;
    use crate::db::Store;
    use crate::domain::NewLocation;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeGeocoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<NewLocation, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query == "nowhere" {
                return Err(ProviderError::shape("geocode", "no results for query"));
            }
            Ok(NewLocation {
                formatted_query: format!("{query}, USA"),
                latitude: 47.6,
                longitude: -122.3,
            })
        }
    }

    async fn service() -> (DefaultLocationService, Arc<FakeGeocoder>, Store) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let geocoder = Arc::new(FakeGeocoder::default());
        let service = DefaultLocationService::new(Arc::new(store.clone()), geocoder.clone());
        (service, geocoder, store)
    }

    #[tokio::test]
    async fn resolve_geocodes_once_per_query() {
        let (service, geocoder, store) = service().await;

        let first = service.resolve("Seattle").await.unwrap();
        let second = service.resolve("Seattle").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.formatted_query, "Seattle, USA");
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.count_locations().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn resolve_surfaces_empty_geocode_and_stores_nothing() {
        let (service, _geocoder, store) = service().await;

        let err = service.resolve("nowhere").await.unwrap_err();

        assert!(matches!(
            err,
            LookupError::Provider(ProviderError::ShapeMismatch { .. })
        ));
        assert_eq!(store.count_locations().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (service, _geocoder, _store) = service().await;

        let err = service.get(LocationId::new(42)).await.unwrap_err();
        assert!(matches!(err, LookupError::LocationNotFound(id) if id.value() == 42));
    }
}
