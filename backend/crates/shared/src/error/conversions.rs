//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`],
//! plus the HTTP rendering of `AppError` behind the `axum` feature.

use super::app_error::AppError;

/// Message returned when a path or body id does not parse
pub const INVALID_ID_MESSAGE: &str = "Resource not found. Invalid: id";

// ============================================================================
// uuid / serde_json conversions
// ============================================================================

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::bad_request(INVALID_ID_MESSAGE).with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl AppError {
    /// Central reading of a driver error; the cause is not attached
    ///
    /// Crate errors that keep the `sqlx::Error` call this both for their
    /// status and for the body they render.
    pub fn from_database(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut => {
                AppError::service_unavailable("Database connection pool exhausted")
            }
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // unique_violation: the constraint name stands in for the field
                Some("23505") => {
                    let field = db_err.constraint().unwrap_or("value");
                    AppError::bad_request(format!("Duplicate {field} entered"))
                }
                Some("23502") => AppError::bad_request("Required field is null"),
                Some("23503") => AppError::bad_request("Referenced record does not exist"),
                Some("22P02") => AppError::bad_request(INVALID_ID_MESSAGE),
                Some("53000" | "53100" | "53200" | "53300") => {
                    AppError::service_unavailable("Database resource exhausted")
                }
                Some("57000" | "57014" | "57P01" | "57P02" | "57P03") => {
                    AppError::service_unavailable("Database unavailable")
                }
                _ => AppError::internal("Database error"),
            },
            sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error"),
            _ => AppError::internal("Database error"),
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::from_database(&err).with_source(err)
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

/// Body of every 400 caused by an unreadable JSON request
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Rejections carry serde detail, so only a fixed message reaches the client
#[cfg(feature = "axum")]
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        use axum::extract::rejection::JsonRejection;

        let message = match &rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Request body must be sent as application/json"
            }
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            _ => INVALID_BODY_MESSAGE,
        };
        tracing::debug!(error = %rejection, "Rejected request body");
        AppError::bad_request(message).with_source(rejection)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "success": false,
            "message": self.client_message(),
        });

        (status, Json(body)).into_response()
    }
}
