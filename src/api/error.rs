use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::logic::ValidationError;
use crate::store::StoreError;

/// Everything a handler can answer with besides success. The body of the
/// response is the message as a bare JSON string.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be parsed
    #[error("{0}")]
    Bind(String),
    #[error("{0}")]
    Validation(String),
    /// The entity the request targets does not exist
    #[error("{0}")]
    NotFound(String),
    /// A name or id the request depends on could not be resolved
    #[error("{0}")]
    MissingReference(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Constraint(String),
    /// The store failed for a reason that is not the caller's fault
    #[error("{0}")]
    Store(String),
    /// The write went through but the result could not be read back
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Bind(_)
            | ApiError::Validation(_)
            | ApiError::MissingReference(_)
            | ApiError::Constraint(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a store failure and prefix it with what the handler was doing
    pub fn from_store(context: &str, error: StoreError) -> Self {
        let message = format!("{}: {}", context, error);
        match error.root() {
            StoreError::UniqueViolation(_) => ApiError::Conflict(message),
            StoreError::ForeignKeyViolation(_) | StoreError::ConstraintViolation(_) => {
                ApiError::Constraint(message)
            }
            _ => ApiError::Store(message),
        }
    }

    /// Failure while reading back a row the handler just wrote
    pub fn refetch(context: &str, error: StoreError) -> Self {
        ApiError::Internal(format!("{}: {}", context, error))
    }

    pub fn validation(context: &str, error: ValidationError) -> Self {
        ApiError::Validation(format!("{}: {}", context, error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            log::error!("[handlers] {} {}", status.as_u16(), message);
        } else {
            log::warn!("[handlers] {} {}", status.as_u16(), message);
        }
        (status, Json(message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        let conflict = ApiError::from_store(
            "unable to add mapping",
            StoreError::UniqueViolation("dup".into()),
        );
        assert!(matches!(conflict, ApiError::Conflict(_)));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.to_string(), "unable to add mapping: duplicate entry: dup");

        let constraint = ApiError::from_store("x", StoreError::ForeignKeyViolation("fk".into()));
        assert_eq!(constraint.status(), StatusCode::BAD_REQUEST);

        let store = ApiError::from_store("x", StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(store.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_batch_errors_classified_by_failing_row() {
        let error = ApiError::from_store(
            "variables not added",
            StoreError::batch_row(3, 0, StoreError::ForeignKeyViolation("class 9".into())),
        );
        assert!(matches!(error, ApiError::Constraint(_)));
        assert!(error.to_string().starts_with("variables not added: row 3 rejected"));
    }

    #[test]
    fn test_not_found_kinds() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MissingReference("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::refetch("new entry not found", StoreError::Database(sqlx::Error::PoolClosed)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_response_body_is_plain_json_string() {
        let response = ApiError::Validation("key must not be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message: String = serde_json::from_slice(&body).unwrap();
        assert_eq!(message, "key must not be empty");
    }
}
