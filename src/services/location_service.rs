//! Domain service for resolving free-text queries to stored locations.

use super::cache::LookupError;
use crate::domain::{Location, LocationId};

/// Find-or-create of a [`Location`] keyed by the query exactly as typed.
#[async_trait::async_trait]
pub trait LocationService: Send + Sync {
    /// Returns the stored location for `query`, geocoding and storing it on
    /// first sight.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Provider`] if geocoding fails or finds nothing
    /// - [`LookupError::Store`] if the store cannot be read or written
    async fn resolve(&self, query: &str) -> Result<Location, LookupError>;

    /// # Errors
    ///
    /// - [`LookupError::LocationNotFound`] if no location has this id
    async fn get(&self, id: LocationId) -> Result<Location, LookupError>;
}
