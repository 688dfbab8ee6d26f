use super::{ProviderError, ProviderQuery, ResourceProvider, get_json, parse_url};
use crate::config::ProviderConfig;
use crate::constants::providers::MOVIE_POSTER_BASE;
use crate::domain::{MovieSummary, ResourceKind, ResourceRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "tmdb";

#[derive(Debug, Deserialize)]
pub struct MovieSearchResponse {
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
}

/// The Movie Database search client, queried with the location's search text.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    config: ProviderConfig,
}

impl TmdbClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }
}

#[must_use]
pub fn normalize(movie: TmdbMovie) -> MovieSummary {
    let image_url = movie
        .poster_path
        .filter(|p| !p.is_empty())
        .map(|path| format!("{MOVIE_POSTER_BASE}{path}"));

    MovieSummary {
        title: movie.title,
        overview: movie.overview,
        average_votes: movie.vote_average,
        total_votes: movie.vote_count,
        image_url,
        popularity: movie.popularity,
        released_on: movie.release_date.filter(|d| !d.is_empty()),
    }
}

#[async_trait]
impl ResourceProvider for TmdbClient {
    fn kind(&self) -> ResourceKind {
        ResourceKind::MovieSummary
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<ResourceRecord>, ProviderError> {
        let url = parse_url(
            PROVIDER,
            &self.config.base_url,
            &[
                ("api_key", self.config.api_key.clone()),
                ("query", query.search_query.clone()),
            ],
        )?;

        let response: MovieSearchResponse = get_json(PROVIDER, self.client.get(url)).await?;

        Ok(response
            .results
            .into_iter()
            .map(|m| normalize(m).into())
            .collect())
    }
}
