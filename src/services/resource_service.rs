//! Domain service for the cached resources attached to a location.

use super::cache::LookupError;
use crate::domain::{LocationId, ResourceKind, StoredRecord};

/// Cache-through access to every resource kind.
#[async_trait::async_trait]
pub trait ResourceService: Send + Sync {
    /// Returns the fresh batch of `kind` rows for a stored location,
    /// refreshing it from the provider when empty or stale.
    ///
    /// # Errors
    ///
    /// - [`LookupError::LocationNotFound`] if the location id is unknown
    /// - [`LookupError::Provider`] if a refresh was needed and failed
    /// - [`LookupError::Store`] on any store failure
    async fn fetch(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> Result<Vec<StoredRecord>, LookupError>;

    /// Drops the cached batch so the next fetch refreshes it.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Store`] if the delete fails
    async fn purge(&self, kind: ResourceKind, location_id: LocationId)
    -> Result<u64, LookupError>;
}
