use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::constants::http::GENERIC_FAILURE_MESSAGE;
use crate::services::LookupError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    StoreError(String),

    ProviderError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::StoreError(msg) => write!(f, "Store error: {}", msg),
            ApiError::ProviderError(msg) => write!(f, "Provider error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Store and provider failures are indistinguishable to the caller.
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::StoreError(msg) => {
                tracing::error!("Store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_FAILURE_MESSAGE.to_string(),
                )
            }
            ApiError::ProviderError(msg) => {
                tracing::warn!("Provider error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_FAILURE_MESSAGE.to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::LocationNotFound(id) => Self::not_found("Location", id),
            LookupError::Store(e) => Self::StoreError(e.to_string()),
            LookupError::Provider(e) => Self::ProviderError(e.to_string()),
        }
    }
}

impl From<crate::db::StoreError> for ApiError {
    fn from(err: crate::db::StoreError) -> Self {
        Self::StoreError(err.to_string())
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ProviderError;
    use crate::db::StoreError;
    use crate::domain::LocationId;

    #[test]
    fn store_and_provider_failures_share_one_status() {
        let store: ApiError = LookupError::Store(StoreError::Unavailable("down".into())).into();
        let provider: ApiError =
            LookupError::Provider(ProviderError::unavailable("yelp", "HTTP 502")).into();

        assert_eq!(
            store.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            provider.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_location_is_not_found() {
        let err: ApiError = LookupError::LocationNotFound(LocationId::new(3)).into();
        assert_eq!(err.to_string(), "Not found: Location 3 not found");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
