use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use datapage_core::error::CoreError;
use datapage_db::DbError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds the database variant.
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// of the form `{ "error": <message>, "code": <stable-code> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `datapage_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx. Detail is logged, never surfaced.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(e) => AppError::Database(e),
            DbError::Core(e) => AppError::Core(e),
        }
    }
}

impl AppError {
    /// Status, stable machine-readable code, and public message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::InvalidParameters(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid-parameters", msg.clone())
                }
                CoreError::EmptyFields => (
                    StatusCode::BAD_REQUEST,
                    "empty-fields",
                    core.to_string(),
                ),
                CoreError::PermissionDenied => {
                    (StatusCode::FORBIDDEN, "permission-denied", core.to_string())
                }
                CoreError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, "invalid-token", core.to_string())
                }
                CoreError::NoLocationItem => {
                    (StatusCode::NOT_FOUND, "no-location-item", core.to_string())
                }
                CoreError::IntervalTooSmall => (
                    StatusCode::BAD_REQUEST,
                    "interval-too-small",
                    core.to_string(),
                ),
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "not-found",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "server-error",
                        "An internal error occurred".to_string(),
                    )
                }
            },
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server-error",
                    "An internal error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: AppError) -> (StatusCode, &'static str) {
        let (status, code, _) = err.parts();
        (status, code)
    }

    #[test]
    fn domain_errors_map_to_stable_codes() {
        assert_eq!(
            code_of(CoreError::InvalidParameters("form_id".into()).into()),
            (StatusCode::BAD_REQUEST, "invalid-parameters")
        );
        assert_eq!(
            code_of(CoreError::EmptyFields.into()),
            (StatusCode::BAD_REQUEST, "empty-fields")
        );
        assert_eq!(
            code_of(CoreError::PermissionDenied.into()),
            (StatusCode::FORBIDDEN, "permission-denied")
        );
        assert_eq!(
            code_of(CoreError::InvalidToken.into()),
            (StatusCode::UNAUTHORIZED, "invalid-token")
        );
        assert_eq!(
            code_of(CoreError::NoLocationItem.into()),
            (StatusCode::NOT_FOUND, "no-location-item")
        );
        assert_eq!(
            code_of(CoreError::IntervalTooSmall.into()),
            (StatusCode::BAD_REQUEST, "interval-too-small")
        );
    }

    #[test]
    fn internal_detail_is_not_surfaced() {
        let (_, code, message) = AppError::Core(CoreError::Internal(
            "connection refused at 10.0.0.5".into(),
        ))
        .parts();
        assert_eq!(code, "server-error");
        assert!(!message.contains("10.0.0.5"));
    }
}
