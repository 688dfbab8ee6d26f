pub mod location;
pub mod resource;
