use sea_orm::DbErr;
use thiserror::Error;

/// Failures surfaced by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::Unavailable(err.to_string()),
            other => Self::QueryFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnAcquireErr, RuntimeErr};

    #[test]
    fn connection_errors_map_to_unavailable() {
        let err: StoreError = DbErr::ConnectionAcquire(ConnAcquireErr::Timeout).into();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err: StoreError = DbErr::Conn(RuntimeErr::Internal("refused".to_string())).into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn other_errors_map_to_query_failed() {
        let err: StoreError = DbErr::Custom("bad sql".to_string()).into();
        assert!(matches!(err, StoreError::QueryFailed(_)));
        let message = err.to_string();
        assert!(message.starts_with("Query failed"));
        assert!(message.contains("bad sql"));
    }
}
