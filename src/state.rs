use std::sync::Arc;

use crate::clients::geocode::GoogleGeocoder;
use crate::clients::hiking::HikingClient;
use crate::clients::meetup::MeetupClient;
use crate::clients::tmdb::TmdbClient;
use crate::clients::weather::WeatherClient;
use crate::clients::yelp::YelpClient;
use crate::clients::{Geocoder, ResourceProvider};
use crate::config::Config;
use crate::db::{RecordStore, Store};
use crate::domain::{Clock, SystemClock};
use crate::services::{
    CacheCoordinator, CachedResourceService, DefaultLocationService, LocationService,
    ResourceService,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Every provider reuses it so connections are pooled.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("city-explorer/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub locations: Arc<dyn LocationService>,

    pub resources: Arc<dyn ResourceService>,
}

impl SharedState {
    /// Opens the configured store and wires the real provider clients.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client = build_shared_http_client(config.providers.request_timeout_seconds)?;
        let providers = &config.providers;

        let geocoder = Arc::new(GoogleGeocoder::with_shared_client(
            http_client.clone(),
            providers.geocode.clone(),
        ));

        let resource_providers: Vec<Arc<dyn ResourceProvider>> = vec![
            Arc::new(WeatherClient::with_shared_client(
                http_client.clone(),
                providers.weather.clone(),
            )),
            Arc::new(YelpClient::with_shared_client(
                http_client.clone(),
                providers.yelp.clone(),
            )),
            Arc::new(TmdbClient::with_shared_client(
                http_client.clone(),
                providers.movies.clone(),
            )),
            Arc::new(MeetupClient::with_shared_client(
                http_client.clone(),
                providers.meetups.clone(),
            )),
            Arc::new(HikingClient::with_shared_client(
                http_client,
                providers.trails.clone(),
            )),
        ];

        Ok(Self::with_components(
            config,
            store,
            geocoder,
            resource_providers,
            Arc::new(SystemClock),
        ))
    }

    /// Wires services around an already opened store. Used directly by tests
    /// that substitute providers or the clock.
    #[must_use]
    pub fn with_components(
        config: Config,
        store: Store,
        geocoder: Arc<dyn Geocoder>,
        providers: Vec<Arc<dyn ResourceProvider>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = store.with_clock(clock.clone());
        let record_store: Arc<dyn RecordStore> = Arc::new(store.clone());

        let locations: Arc<dyn LocationService> = Arc::new(DefaultLocationService::new(
            record_store.clone(),
            geocoder,
        ));

        let coordinator = Arc::new(CacheCoordinator::new(record_store.clone(), clock));

        let resources = providers.into_iter().fold(
            CachedResourceService::new(
                record_store,
                coordinator,
                locations.clone(),
                config.cache.clone(),
            ),
            CachedResourceService::with_provider,
        );

        Self {
            config: Arc::new(config),
            store,
            locations,
            resources: Arc::new(resources),
        }
    }
}
