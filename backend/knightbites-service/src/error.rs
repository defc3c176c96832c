/// Error types for the Knight Bites service
///
/// Every handler returns `Result<HttpResponse>`; the `ResponseError` impl is
/// the single place where failures become HTTP responses. Store failures are
/// opaque to clients and only described in the logs.
use crate::db::QueryError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;
use validator::ValidationErrors;

/// Result type for handler and repository operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Point lookup, update or delete matched no row
    #[error("Not found")]
    NotFound,

    /// Request body failed shape or field validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Statement failed in the executor or the store
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Request the store could never satisfy; detail is logged, not returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn log(&self) {
        match self {
            AppError::Query(err) => {
                tracing::warn!(kind = err.kind(), "request failed in data layer");
                tracing::debug!(error = %err, "data layer failure detail");
            }
            AppError::Internal(msg) => {
                tracing::warn!("request failed with internal error");
                tracing::debug!(error = %msg, "internal error detail");
            }
            AppError::NotFound | AppError::Validation(_) => {}
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Query(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.log();

        let status = self.status_code();
        match self {
            AppError::NotFound => HttpResponse::build(status).finish(),
            AppError::Validation(msg) => HttpResponse::build(status).json(serde_json::json!({
                "error": msg,
                "status": status.as_u16(),
            })),
            AppError::Query(_) | AppError::Internal(_) => {
                HttpResponse::build(status).json(serde_json::json!({
                    "error": "internal server error",
                    "status": status.as_u16(),
                }))
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Query(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    fn body_string(err: &AppError) -> String {
        let bytes = err
            .error_response()
            .into_body()
            .try_into_bytes()
            .unwrap_or_default();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn not_found_has_empty_body() {
        let err = AppError::NotFound;
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(body_string(&err).is_empty());
    }

    #[test]
    fn store_failures_do_not_leak_detail() {
        let err = AppError::from(sqlx::Error::Protocol(
            "relation \"post\" does not exist at 10.0.0.7".to_string(),
        ));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_string(&err);
        assert!(body.contains("internal server error"));
        assert!(!body.contains("relation"));
        assert!(!body.contains("10.0.0.7"));
    }

    #[test]
    fn cardinality_failures_are_server_errors() {
        let err = AppError::from(QueryError::MultipleRows {
            statement: "find_student",
            count: 2,
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body_string(&err).contains("find_student"));
    }

    #[test]
    fn validation_is_bad_request_with_message() {
        let err = AppError::Validation("email: invalid".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(body_string(&err).contains("email: invalid"));
    }

    #[test]
    fn internal_errors_are_opaque() {
        let err = AppError::Internal("signup post id \"xyz\": invalid digit".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body_string(&err).contains("xyz"));
    }
}
