//! Domain types for locations and the resources cached against them.
//!
//! Identifiers use the Newtype pattern so a location id can never be passed
//! where a row id is expected.

pub mod clock;
pub mod records;

pub use clock::{Clock, SystemClock};
pub use records::{
    BusinessListing, MeetupGroup, MovieSummary, ResourceRecord, StoredRecord, Trail,
    WeatherRecord,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a resolved Location.
///
/// Assigned by the store on first insert and never reused.
///
/// # Examples
///
/// ```rust
/// use city_explorer::domain::LocationId;
///
/// let id = LocationId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LocationId(i32);

impl LocationId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "LocationId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<LocationId> for i32 {
    fn from(id: LocationId) -> Self {
        id.0
    }
}

impl From<i32> for LocationId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for LocationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for LocationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// A geocoded place. One row per distinct search query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: LocationId,
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// Fields a geocoder supplies for a new Location; the id and timestamp come
/// from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The kinds of resource cached per location, each in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Weather,
    BusinessListing,
    MovieSummary,
    MeetupGroup,
    Trail,
}

impl ResourceKind {
    pub const ALL: [Self; 5] = [
        Self::Weather,
        Self::BusinessListing,
        Self::MovieSummary,
        Self::MeetupGroup,
        Self::Trail,
    ];

    /// Default freshness threshold for a cached batch of this kind.
    #[must_use]
    pub fn default_ttl(self) -> chrono::Duration {
        use crate::constants::cache;

        match self {
            Self::Weather => chrono::Duration::seconds(cache::WEATHER_TTL_SECS),
            Self::BusinessListing => chrono::Duration::days(cache::BUSINESS_TTL_DAYS),
            Self::MovieSummary => chrono::Duration::hours(cache::MOVIE_TTL_HOURS),
            Self::MeetupGroup => chrono::Duration::hours(cache::MEETUP_TTL_HOURS),
            Self::Trail => chrono::Duration::hours(cache::TRAIL_TTL_HOURS),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::BusinessListing => "business_listing",
            Self::MovieSummary => "movie_summary",
            Self::MeetupGroup => "meetup_group",
            Self::Trail => "trail",
        }
    }

    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Weather => "weathers",
            Self::BusinessListing => "yelps",
            Self::MovieSummary => "movies",
            Self::MeetupGroup => "meetups",
            Self::Trail => "trails",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weather" | "weathers" => Ok(Self::Weather),
            "business_listing" | "yelp" | "yelps" | "businesses" => Ok(Self::BusinessListing),
            "movie_summary" | "movie" | "movies" => Ok(Self::MovieSummary),
            "meetup_group" | "meetup" | "meetups" => Ok(Self::MeetupGroup),
            "trail" | "trails" => Ok(Self::Trail),
            other => Err(format!("unknown resource kind '{other}'")),
        }
    }
}
