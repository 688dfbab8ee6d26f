pub mod cache;
pub use cache::{CacheCoordinator, LookupError, LookupOutcome, MissReason};

pub mod location_service;
pub mod location_service_impl;
pub use location_service::LocationService;
pub use location_service_impl::DefaultLocationService;

pub mod resource_service;
pub mod resource_service_impl;
pub use resource_service::ResourceService;
pub use resource_service_impl::CachedResourceService;
