//! Cache-through lookup policy shared by every resource kind.
//!
//! A lookup reads the batch of rows for one (kind, location), then ends in
//! exactly one of three terminal states:
//!
//! ```text
//! START -> EMPTY                 -> Miss(Empty)
//!       -> NONEMPTY -> FRESH     -> Hit(rows)
//!                   -> STALE     -> evict batch -> Miss(Stale)
//! ```
//!
//! Freshness is judged once per batch from its earliest timestamp, so a
//! lookup never returns a mix of old and new rows.

use crate::clients::ProviderError;
use crate::db::{RecordStore, StoreError};
use crate::domain::{Clock, LocationId, ResourceKind, ResourceRecord, StoredRecord};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Location {0} not found")]
    LocationNotFound(LocationId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    Empty,
    /// The batch was older than its TTL and has been deleted.
    Stale { evicted: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Hit(Vec<StoredRecord>),
    Miss(MissReason),
}

impl LookupOutcome {
    const fn label(&self) -> &'static str {
        match self {
            Self::Hit(_) => "hit",
            Self::Miss(MissReason::Empty) => "miss",
            Self::Miss(MissReason::Stale { .. }) => "stale",
        }
    }
}

type RefreshKey = (ResourceKind, LocationId);

pub struct CacheCoordinator {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    in_flight: Mutex<HashMap<RefreshKey, Arc<Mutex<()>>>>,
}

impl CacheCoordinator {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Decides hit, miss or stale for one (kind, location) batch.
    ///
    /// A stale batch is deleted before this returns. The eviction holds the
    /// same per-key gate as a refresh, so it never removes a batch that a
    /// concurrent refresh has just written. A failed read returns the error
    /// without touching the store again.
    pub async fn lookup(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        ttl: chrono::Duration,
    ) -> Result<LookupOutcome, StoreError> {
        let key = (kind, location_id);
        let gate = self.acquire_gate(key).await;

        let result = {
            let _permit = gate.lock().await;
            self.evaluate(kind, location_id, ttl).await
        };

        self.release_gate(key, gate).await;
        result
    }

    /// Returns fresh cached rows, or runs `refresh` and stores its rows as a
    /// new batch.
    ///
    /// Refreshes are single-flight per (kind, location): a caller that misses
    /// while another refresh is running waits for it and then re-reads the
    /// store instead of fetching again. Only the read outside the gate is
    /// unguarded, and it never mutates.
    pub async fn resolve<F, Fut>(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        ttl: chrono::Duration,
        refresh: F,
    ) -> Result<Vec<StoredRecord>, LookupError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Vec<ResourceRecord>, ProviderError>> + Send,
    {
        if let Some(rows) = self.peek_fresh(kind, location_id, ttl).await? {
            return Ok(rows);
        }

        let key = (kind, location_id);
        let gate = self.acquire_gate(key).await;

        let result = {
            let _permit = gate.lock().await;
            self.refresh_locked(kind, location_id, ttl, refresh).await
        };

        self.release_gate(key, gate).await;
        result
    }

    /// Read-only fast path: the rows when the batch is fresh, otherwise `None`.
    async fn peek_fresh(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        ttl: chrono::Duration,
    ) -> Result<Option<Vec<StoredRecord>>, StoreError> {
        let rows = self.store.find_by_location(kind, location_id).await?;

        let batch_created_at = rows.iter().map(|r| r.created_at).min();

        match batch_created_at {
            Some(batch_created_at) if self.clock.now() - batch_created_at <= ttl => {
                record_outcome(kind, location_id, "hit");
                Ok(Some(rows))
            }
            _ => Ok(None),
        }
    }

    /// Full hit/miss/stale decision. Callers must hold the gate for the key.
    async fn evaluate(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        ttl: chrono::Duration,
    ) -> Result<LookupOutcome, StoreError> {
        let rows = self.store.find_by_location(kind, location_id).await?;

        let batch_created_at = rows.iter().map(|r| r.created_at).min();

        let outcome = match batch_created_at {
            None => LookupOutcome::Miss(MissReason::Empty),
            Some(batch_created_at) => {
                let age = self.clock.now() - batch_created_at;
                if age > ttl {
                    let evicted = self.store.delete_by_location(kind, location_id).await?;
                    info!(
                        %kind,
                        %location_id,
                        evicted,
                        age_ms = age.num_milliseconds(),
                        "Evicted stale batch"
                    );
                    LookupOutcome::Miss(MissReason::Stale { evicted })
                } else {
                    LookupOutcome::Hit(rows)
                }
            }
        };

        record_outcome(kind, location_id, outcome.label());
        Ok(outcome)
    }

    async fn refresh_locked<F, Fut>(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        ttl: chrono::Duration,
        refresh: F,
    ) -> Result<Vec<StoredRecord>, LookupError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Vec<ResourceRecord>, ProviderError>> + Send,
    {
        // Another caller may have refreshed while this one waited.
        if let LookupOutcome::Hit(rows) = self.evaluate(kind, location_id, ttl).await? {
            return Ok(rows);
        }

        let records = refresh().await?;
        let stored = self.store.insert_batch(kind, location_id, records).await?;
        info!(%kind, %location_id, rows = stored.len(), "Refreshed batch from provider");
        Ok(stored)
    }

    async fn acquire_gate(&self, key: RefreshKey) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.entry(key).or_default().clone()
    }

    async fn release_gate(&self, key: RefreshKey, gate: Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().await;
        // One reference in the map plus ours means nobody else is waiting.
        if Arc::strong_count(&gate) == 2 {
            in_flight.remove(&key);
        }
    }

    #[cfg(test)]
    async fn gates_in_use(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}

fn record_outcome(kind: ResourceKind, location_id: LocationId, outcome: &'static str) {
    debug!(%kind, %location_id, outcome, "Cache lookup");
    metrics::counter!(
        "cache_lookups_total",
        "kind" => kind.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}
