//! Normalized row shapes for each cached resource kind.

use super::{LocationId, ResourceKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub forecast: String,
    /// Calendar day, e.g. `"Mon Oct 15 2026"`.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessListing {
    pub name: String,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub title: String,
    pub overview: String,
    pub average_votes: Option<f64>,
    pub total_votes: Option<i64>,
    pub image_url: Option<String>,
    pub popularity: Option<f64>,
    pub released_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetupGroup {
    pub link: String,
    pub name: String,
    pub creation_date: String,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trail {
    pub name: String,
    pub location: String,
    pub length: Option<f64>,
    pub stars: Option<f64>,
    pub star_votes: Option<i64>,
    pub summary: String,
    pub trail_url: String,
    pub conditions: Option<String>,
    pub condition_date: Option<String>,
    pub condition_time: Option<String>,
}

/// One provider payload, tagged by the kind of resource it belongs to.
///
/// Serializes untagged: a JSON response is just the row's fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceRecord {
    Weather(WeatherRecord),
    BusinessListing(BusinessListing),
    MovieSummary(MovieSummary),
    MeetupGroup(MeetupGroup),
    Trail(Trail),
}

impl ResourceRecord {
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Weather(_) => ResourceKind::Weather,
            Self::BusinessListing(_) => ResourceKind::BusinessListing,
            Self::MovieSummary(_) => ResourceKind::MovieSummary,
            Self::MeetupGroup(_) => ResourceKind::MeetupGroup,
            Self::Trail(_) => ResourceKind::Trail,
        }
    }
}

impl From<WeatherRecord> for ResourceRecord {
    fn from(r: WeatherRecord) -> Self {
        Self::Weather(r)
    }
}

impl From<BusinessListing> for ResourceRecord {
    fn from(r: BusinessListing) -> Self {
        Self::BusinessListing(r)
    }
}

impl From<MovieSummary> for ResourceRecord {
    fn from(r: MovieSummary) -> Self {
        Self::MovieSummary(r)
    }
}

impl From<MeetupGroup> for ResourceRecord {
    fn from(r: MeetupGroup) -> Self {
        Self::MeetupGroup(r)
    }
}

impl From<Trail> for ResourceRecord {
    fn from(r: Trail) -> Self {
        Self::Trail(r)
    }
}

/// A persisted [`ResourceRecord`] with its row id, owning location and batch
/// timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: i32,
    pub location_id: LocationId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: ResourceRecord,
}

impl StoredRecord {
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.record.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_record_serializes_flat() {
        let stored = StoredRecord {
            id: 3,
            location_id: LocationId::new(1),
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
            record: WeatherRecord {
                forecast: "Clear".to_string(),
                time: "Thu Jan 01 1970".to_string(),
            }
            .into(),
        };

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["location_id"], 1);
        assert_eq!(json["forecast"], "Clear");
        assert_eq!(json["time"], "Thu Jan 01 1970");
        assert_eq!(stored.kind(), ResourceKind::Weather);
    }
}
