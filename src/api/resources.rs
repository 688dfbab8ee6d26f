//! Cache-through endpoints, one route per resource kind.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_location_id;
use super::{ApiError, AppState};
use crate::domain::{ResourceKind, StoredRecord};

/// Query string shared by every resource route.
///
/// Browser clients send the location as `data[id]=..&data[latitude]=..`;
/// a bare `id=` is accepted too. Other keys are ignored: the stored location
/// is authoritative for coordinates and search text.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceParams {
    #[serde(rename = "data[id]")]
    pub data_id: Option<String>,
    pub id: Option<String>,
}

impl ResourceParams {
    /// The `data[id]` form wins when both are present.
    #[must_use]
    pub fn location_id(&self) -> Option<&str> {
        self.data_id.as_deref().or(self.id.as_deref())
    }
}

async fn serve(
    kind: ResourceKind,
    state: &AppState,
    params: &ResourceParams,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    let location_id = validate_location_id(params.location_id())?;
    tracing::Span::current().record("location_id", location_id.value());
    let rows = state.shared.resources.fetch(kind, location_id).await?;
    Ok(Json(rows))
}

/// `GET /weather?data[id]=<location id>`
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    serve(ResourceKind::Weather, &state, &params).await
}

/// `GET /yelp?data[id]=<location id>`
pub async fn get_yelp(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    serve(ResourceKind::BusinessListing, &state, &params).await
}

/// `GET /movies?data[id]=<location id>`
pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    serve(ResourceKind::MovieSummary, &state, &params).await
}

/// `GET /meetups?data[id]=<location id>`
pub async fn get_meetups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    serve(ResourceKind::MeetupGroup, &state, &params).await
}

/// `GET /trails?data[id]=<location id>`
pub async fn get_trails(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    serve(ResourceKind::Trail, &state, &params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn parse(uri: &'static str) -> ResourceParams {
        Query::<ResourceParams>::try_from_uri(&Uri::from_static(uri))
            .unwrap()
            .0
    }

    #[test]
    fn nested_data_id_is_read() {
        let params =
            parse("/weather?data%5Bid%5D=4&data%5Blatitude%5D=34.09&data%5Bsearch_query%5D=90210");
        assert_eq!(params.location_id(), Some("4"));
    }

    #[test]
    fn bare_id_is_accepted() {
        assert_eq!(parse("/trails?id=2").location_id(), Some("2"));
    }

    #[test]
    fn nested_id_wins_over_bare_id() {
        assert_eq!(parse("/movies?id=2&data%5Bid%5D=5").location_id(), Some("5"));
    }

    #[test]
    fn missing_id_is_none() {
        assert_eq!(parse("/yelp?data%5Blatitude%5D=1").location_id(), None);
    }
}
