//! Catalog Error Types
//!
//! This module provides catalog-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::kv::KvError;
use platform::mail::MailError;
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific error variants
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Course not found")]
    CourseNotFound,

    /// The caller has not purchased the course
    #[error("You are not eligible to access this course")]
    NotEligible,

    #[error("You have already purchased this course")]
    AlreadyPurchased,

    #[error("Invalid content id")]
    InvalidContentId,

    #[error("Content not found")]
    ContentNotFound,

    #[error("Invalid question id")]
    InvalidQuestionId,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Notification not found")]
    NotificationNotFound,

    #[error("User not found")]
    UserNotFound,

    /// Rejected input (ratings, empty text, malformed ids)
    #[error("{0}")]
    Validation(String),

    /// Failure inside the auth crate (user store, session sync)
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Cache store error: {0}")]
    Store(#[from] KvError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::CourseNotFound
            | CatalogError::NotEligible
            | CatalogError::ContentNotFound
            | CatalogError::ReviewNotFound
            | CatalogError::NotificationNotFound
            | CatalogError::UserNotFound => ErrorKind::NotFound,
            CatalogError::AlreadyPurchased
            | CatalogError::InvalidContentId
            | CatalogError::InvalidQuestionId
            | CatalogError::Validation(_) => ErrorKind::BadRequest,
            CatalogError::Auth(e) => e.kind(),
            CatalogError::Database(e) => AppError::from_database(e).kind(),
            CatalogError::Mail(_) | CatalogError::Store(_) | CatalogError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CatalogError::Database(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Store(e) => {
                tracing::error!(error = %e, "Cache store error");
            }
            CatalogError::Mail(e) => {
                tracing::error!(error = %e, "Mail enqueue failed");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            CatalogError::Auth(e) if e.kind().is_server_error() => {
                tracing::error!(error = %e, "Auth failure inside catalog request");
            }
            CatalogError::NotEligible => {
                tracing::warn!("Course content requested without purchase");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Database(e) => AppError::from(e),
            CatalogError::Auth(e) => e.to_app_error(),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl From<AppError> for CatalogError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            CatalogError::Internal(err.to_string())
        } else {
            CatalogError::Validation(err.message().to_string())
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    /// Postgres unique-key violation as the driver reports it
    #[derive(Debug)]
    struct UniqueViolation(&'static str);

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "duplicate key value violates unique constraint \"{}\"", self.0)
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.0)
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    fn unique_violation(constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(UniqueViolation(constraint)))
    }

    #[test]
    fn test_statuses() {
        assert_eq!(CatalogError::CourseNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(CatalogError::NotEligible.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            CatalogError::AlreadyPurchased.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_keep_their_kind() {
        let err = CatalogError::from(AuthError::SessionExpired);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Could not refresh token");
    }

    #[test]
    fn test_server_errors_are_masked() {
        let app: AppError = CatalogError::Internal("pool exhausted".into()).into();
        assert_eq!(app.client_message(), "Internal server error");

        let app: AppError = CatalogError::NotEligible.into();
        assert_eq!(
            app.client_message(),
            "You are not eligible to access this course"
        );
    }

    #[test]
    fn test_unique_violation_is_bad_request() {
        let err = CatalogError::from(unique_violation("orders_pkey"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let app: AppError = err.into();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.client_message(), "Duplicate orders_pkey entered");
    }

    #[test]
    fn test_auth_database_errors_keep_the_shared_mapping() {
        let err = CatalogError::from(AuthError::from(unique_violation("users_email_key")));

        let app: AppError = err.into();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.client_message(), "Duplicate users_email_key entered");
    }
}
