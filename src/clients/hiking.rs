use super::{ProviderError, ProviderQuery, ResourceProvider, get_json, parse_url};
use crate::config::ProviderConfig;
use crate::constants::providers::TRAIL_MAX_DISTANCE_MILES;
use crate::domain::{ResourceKind, ResourceRecord, Trail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "hiking";

#[derive(Debug, Deserialize)]
pub struct TrailsResponse {
    pub trails: Vec<HikingTrail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HikingTrail {
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub length: Option<f64>,
    pub stars: Option<f64>,
    pub star_votes: Option<i64>,
    #[serde(default)]
    pub summary: String,
    pub url: String,
    pub condition_status: Option<String>,
    /// `"YYYY-MM-DD HH:MM:SS"`
    pub condition_date: Option<String>,
}

/// Hiking Project trail search around a coordinate.
#[derive(Clone)]
pub struct HikingClient {
    client: Client,
    config: ProviderConfig,
}

impl HikingClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }
}

#[must_use]
pub fn normalize(trail: HikingTrail) -> Trail {
    let (condition_date, condition_time) = match trail.condition_date.as_deref() {
        Some(stamp) => match stamp.split_once(' ') {
            Some((date, time)) => (Some(date.to_string()), Some(time.to_string())),
            None => (Some(stamp.to_string()), None),
        },
        None => (None, None),
    };

    Trail {
        name: trail.name,
        location: trail.location,
        length: trail.length,
        stars: trail.stars,
        star_votes: trail.star_votes,
        summary: trail.summary,
        trail_url: trail.url,
        conditions: trail.condition_status,
        condition_date,
        condition_time,
    }
}

#[async_trait]
impl ResourceProvider for HikingClient {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Trail
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<ResourceRecord>, ProviderError> {
        let url = parse_url(
            PROVIDER,
            &self.config.base_url,
            &[
                ("lat", query.latitude.to_string()),
                ("lon", query.longitude.to_string()),
                ("maxDistance", TRAIL_MAX_DISTANCE_MILES.to_string()),
                ("key", self.config.api_key.clone()),
            ],
        )?;

        let response: TrailsResponse = get_json(PROVIDER, self.client.get(url)).await?;

        Ok(response
            .trails
            .into_iter()
            .map(|t| normalize(t).into())
            .collect())
    }
}
