use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_location_query;
use super::{ApiError, AppState};
use crate::domain::Location;

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub data: Option<String>,
}

/// Resolves a free-text query to a stored location, geocoding it on first
/// sight.
///
/// # Endpoint
/// `GET /location?data=<query>`
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Location>, ApiError> {
    let query = validate_location_query(params.data.as_deref())?;
    let location = state.shared.locations.resolve(query).await?;
    Ok(Json(location))
}
