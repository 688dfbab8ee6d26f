use super::{ProviderError, ProviderQuery, ResourceProvider, day_string, get_json, parse_url};
use crate::config::ProviderConfig;
use crate::constants::providers::MEETUP_PAGE_SIZE;
use crate::domain::{MeetupGroup, ResourceKind, ResourceRecord};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "meetup";

#[derive(Debug, Deserialize)]
pub struct Group {
    pub link: String,
    pub name: String,
    /// Unix milliseconds.
    pub created: i64,
    pub organizer: Organizer,
}

#[derive(Debug, Deserialize)]
pub struct Organizer {
    pub name: String,
}

/// Meetup "find groups" client; the response body is a bare array.
#[derive(Clone)]
pub struct MeetupClient {
    client: Client,
    config: ProviderConfig,
}

impl MeetupClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }
}

pub fn normalize(group: Group) -> Result<MeetupGroup, ProviderError> {
    let created = DateTime::from_timestamp_millis(group.created).ok_or_else(|| {
        ProviderError::shape(PROVIDER, format!("created out of range: {}", group.created))
    })?;

    Ok(MeetupGroup {
        link: group.link,
        name: group.name,
        creation_date: day_string(created),
        host: group.organizer.name,
    })
}

#[async_trait]
impl ResourceProvider for MeetupClient {
    fn kind(&self) -> ResourceKind {
        ResourceKind::MeetupGroup
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<ResourceRecord>, ProviderError> {
        let url = parse_url(
            PROVIDER,
            &self.config.base_url,
            &[
                ("location", query.search_query.clone()),
                ("page", MEETUP_PAGE_SIZE.to_string()),
                ("key", self.config.api_key.clone()),
            ],
        )?;

        let groups: Vec<Group> = get_json(PROVIDER, self.client.get(url)).await?;

        groups
            .into_iter()
            .map(|g| normalize(g).map(ResourceRecord::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_uses_organizer_as_host() {
        let groups: Vec<Group> = serde_json::from_str(
            r#"[
                {
                    "id": 1,
                    "name": "LA Hikers",
                    "link": "https://www.meetup.com/la-hikers/",
                    "created": 1539561600000,
                    "organizer": { "id": 9, "name": "Sam" }
                }
            ]"#,
        )
        .unwrap();

        let group = normalize(groups.into_iter().next().unwrap()).unwrap();
        assert_eq!(group.name, "LA Hikers");
        assert_eq!(group.host, "Sam");
        assert_eq!(group.creation_date, "Mon Oct 15 2018");
    }

    #[test]
    fn missing_organizer_fails_to_decode() {
        let decoded = serde_json::from_str::<Vec<Group>>(
            r#"[ { "name": "x", "link": "y", "created": 0 } ]"#,
        );
        assert!(decoded.is_err());
    }
}
