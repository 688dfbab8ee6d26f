//! HTTP clients for the third-party data providers.
//!
//! Each client fetches one provider's JSON and normalizes it into the local
//! row shape for its resource kind.

pub mod geocode;
pub mod hiking;
pub mod meetup;
pub mod tmdb;
pub mod weather;
pub mod yelp;

use crate::domain::{NewLocation, ResourceKind, ResourceRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} unavailable: {message}")]
    Unavailable {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned an unexpected response: {message}")]
    ShapeMismatch {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider,
            message: message.into(),
        }
    }

    pub fn shape(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            provider,
            message: message.into(),
        }
    }
}

/// What a provider needs to know about the location it is fetching for.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderQuery {
    pub search_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A source of fresh rows for one resource kind.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    fn kind(&self) -> ResourceKind;

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<ResourceRecord>, ProviderError>;
}

/// Resolves a free-text query to a place.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<NewLocation, ProviderError>;
}

/// Sends `request` and decodes a 2xx JSON body.
///
/// Transport failures and non-2xx statuses are `Unavailable`; a body that
/// does not decode into `T` is a `ShapeMismatch`.
pub(crate) async fn get_json<T>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => {
            record_request(provider, "error");
            return Err(ProviderError::unavailable(provider, e.to_string()));
        }
    };

    let status = response.status();
    if !status.is_success() {
        record_request(provider, "error");
        warn!(provider, status = status.as_u16(), "Provider returned non-success status");
        return Err(ProviderError::unavailable(provider, format!("HTTP {status}")));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ProviderError::unavailable(provider, e.to_string()))?;

    match serde_json::from_slice(&body) {
        Ok(decoded) => {
            record_request(provider, "success");
            Ok(decoded)
        }
        Err(e) => {
            record_request(provider, "shape_mismatch");
            Err(ProviderError::shape(provider, e.to_string()))
        }
    }
}

fn record_request(provider: &'static str, status: &'static str) {
    metrics::counter!("provider_requests_total", "provider" => provider, "status" => status)
        .increment(1);
}

/// Renders a day like `"Mon Oct 15 2026"`.
pub(crate) fn day_string(at: DateTime<Utc>) -> String {
    at.format("%a %b %d %Y").to_string()
}

pub(crate) fn parse_url(
    provider: &'static str,
    base: &str,
    params: &[(&str, String)],
) -> Result<url::Url, ProviderError> {
    url::Url::parse_with_params(base, params)
        .map_err(|e| ProviderError::unavailable(provider, format!("invalid URL {base}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_string_matches_calendar_format() {
        let at = DateTime::from_timestamp(1_539_561_600, 0).unwrap();
        assert_eq!(day_string(at), "Mon Oct 15 2018");
    }

    #[test]
    fn parse_url_encodes_params() {
        let url = parse_url(
            "test",
            "https://example.com/search",
            &[("query", "Beverly Hills".to_string())],
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://example.com/search?query=Beverly+Hills");
    }

    #[test]
    fn parse_url_rejects_garbage_base() {
        let err = parse_url("test", "not a url", &[]).unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }
}
