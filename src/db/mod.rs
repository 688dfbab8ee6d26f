use crate::domain::{
    Clock, Location, LocationId, NewLocation, ResourceKind, ResourceRecord, StoredRecord,
    SystemClock,
};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub mod error;
pub mod migrator;
pub mod repositories;

pub use error::StoreError;

/// Durable storage of locations and the resource rows cached against them.
///
/// Every read and write is scoped by location id. Implementations must
/// tolerate overlapping calls from concurrent requests.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Rows of `kind` for a location in insertion order. Never mutates.
    async fn find_by_location(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> Result<Vec<StoredRecord>, StoreError>;

    /// Deletes all rows of `kind` for a location and returns how many went.
    async fn delete_by_location(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> Result<u64, StoreError>;

    /// Appends one row stamped with the current time.
    async fn insert(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        record: ResourceRecord,
    ) -> Result<StoredRecord, StoreError>;

    /// Appends rows that share one timestamp, forming a single batch.
    async fn insert_batch(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        records: Vec<ResourceRecord>,
    ) -> Result<Vec<StoredRecord>, StoreError>;

    async fn find_location_by_query(&self, query: &str) -> Result<Option<Location>, StoreError>;

    async fn find_location(&self, id: LocationId) -> Result<Option<Location>, StoreError>;

    /// Idempotent: when `query` is already stored the existing row is
    /// returned untouched.
    async fn insert_location(
        &self,
        query: &str,
        fields: NewLocation,
    ) -> Result<Location, StoreError>;
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self {
            conn,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the clock used to stamp inserted rows.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    pub async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await?;
        Ok(())
    }

    fn location_repo(&self) -> repositories::location::LocationRepository {
        repositories::location::LocationRepository::new(self.conn.clone())
    }

    fn resource_repo(&self) -> repositories::resource::ResourceRepository {
        repositories::resource::ResourceRepository::new(self.conn.clone())
    }

    pub async fn count_locations(&self) -> Result<u64, StoreError> {
        Ok(self.location_repo().count().await?)
    }
}

#[async_trait]
impl RecordStore for Store {
    async fn find_by_location(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self
            .resource_repo()
            .find_by_location(kind, location_id)
            .await?)
    }

    async fn delete_by_location(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> Result<u64, StoreError> {
        let deleted = self
            .resource_repo()
            .delete_by_location(kind, location_id)
            .await?;
        debug!(%kind, %location_id, deleted, "Deleted cached rows");
        Ok(deleted)
    }

    async fn insert(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        record: ResourceRecord,
    ) -> Result<StoredRecord, StoreError> {
        let mut rows = self.insert_batch(kind, location_id, vec![record]).await?;
        rows.pop()
            .ok_or_else(|| StoreError::QueryFailed("insert returned no row".to_string()))
    }

    async fn insert_batch(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        records: Vec<ResourceRecord>,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let stored = self
            .resource_repo()
            .insert_batch(kind, location_id, &records, self.clock.now())
            .await?;
        debug!(%kind, %location_id, rows = stored.len(), "Inserted cached rows");
        Ok(stored)
    }

    async fn find_location_by_query(&self, query: &str) -> Result<Option<Location>, StoreError> {
        Ok(self.location_repo().find_by_query(query).await?)
    }

    async fn find_location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        Ok(self.location_repo().get(id).await?)
    }

    async fn insert_location(
        &self,
        query: &str,
        fields: NewLocation,
    ) -> Result<Location, StoreError> {
        Ok(self
            .location_repo()
            .insert_or_get(query, &fields, self.clock.now())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeatherRecord;
    use crate::domain::clock::ManualClock;

    async fn memory_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    fn beverly_hills() -> NewLocation {
        NewLocation {
            formatted_query: "Beverly Hills, CA".to_string(),
            latitude: 34.09,
            longitude: -118.4,
        }
    }

    fn weather(forecast: &str) -> ResourceRecord {
        WeatherRecord {
            forecast: forecast.to_string(),
            time: "Mon Oct 12 2026".to_string(),
        }
        .into()
    }

    #[tokio::test]
    async fn insert_location_is_idempotent_per_query() {
        let store = memory_store().await;

        let first = store.insert_location("90210", beverly_hills()).await.unwrap();
        let second = store
            .insert_location(
                "90210",
                NewLocation {
                    formatted_query: "Somewhere else".to_string(),
                    latitude: 0.0,
                    longitude: 0.0,
                },
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.formatted_query, "Beverly Hills, CA");
        assert_eq!(store.count_locations().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_location_by_query_misses_unknown_query() {
        let store = memory_store().await;
        store.insert_location("90210", beverly_hills()).await.unwrap();

        assert!(store.find_location_by_query("10001").await.unwrap().is_none());
        let found = store.find_location_by_query("90210").await.unwrap().unwrap();
        assert_eq!(found.search_query, "90210");
    }

    #[tokio::test]
    async fn rows_are_scoped_by_kind_and_location() {
        let store = memory_store().await;
        let a = store.insert_location("a", beverly_hills()).await.unwrap().id;
        let b = store.insert_location("b", beverly_hills()).await.unwrap().id;

        store
            .insert_batch(ResourceKind::Weather, a, vec![weather("one"), weather("two")])
            .await
            .unwrap();
        store
            .insert(ResourceKind::Weather, b, weather("other"))
            .await
            .unwrap();

        let rows = store
            .find_by_location(ResourceKind::Weather, a)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.location_id == a));
        assert!(
            store
                .find_by_location(ResourceKind::Trail, a)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn batch_rows_share_one_timestamp_and_keep_insertion_order() {
        let clock = Arc::new(ManualClock::at_millis(1_000_000));
        let store = memory_store().await.with_clock(clock.clone());
        let loc = store.insert_location("x", beverly_hills()).await.unwrap().id;

        store
            .insert_batch(
                ResourceKind::Weather,
                loc,
                vec![weather("first"), weather("second"), weather("third")],
            )
            .await
            .unwrap();

        let rows = store
            .find_by_location(ResourceKind::Weather, loc)
            .await
            .unwrap();
        let forecasts: Vec<_> = rows
            .iter()
            .map(|r| match &r.record {
                ResourceRecord::Weather(w) => w.forecast.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(forecasts, ["first", "second", "third"]);
        assert!(rows.iter().all(|r| r.created_at.timestamp_millis() == 1_000_000));
    }

    #[tokio::test]
    async fn delete_by_location_on_empty_table_is_a_no_op() {
        let store = memory_store().await;
        let loc = store.insert_location("x", beverly_hills()).await.unwrap().id;

        let deleted = store
            .delete_by_location(ResourceKind::MovieSummary, loc)
            .await
            .unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn delete_by_location_removes_whole_batch() {
        let store = memory_store().await;
        let loc = store.insert_location("x", beverly_hills()).await.unwrap().id;
        store
            .insert_batch(ResourceKind::Weather, loc, vec![weather("a"), weather("b")])
            .await
            .unwrap();

        let deleted = store
            .delete_by_location(ResourceKind::Weather, loc)
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert!(
            store
                .find_by_location(ResourceKind::Weather, loc)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn insert_rejects_row_of_another_kind() {
        let store = memory_store().await;
        let loc = store.insert_location("x", beverly_hills()).await.unwrap().id;

        let err = store
            .insert(ResourceKind::Trail, loc, weather("mismatch"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_store() {
        let store = memory_store().await;
        store.ping().await.unwrap();
    }
}
