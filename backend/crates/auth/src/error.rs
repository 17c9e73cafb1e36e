//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::kv::KvError;
use platform::mail::MailError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No access token, bad or expired token, or no backing session
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Refresh token did not lead to a live session
    #[error("Could not refresh token")]
    SessionExpired,

    /// Authenticated, but the role is not on the allow-list
    #[error("Role: {role} is not allowed to access this resource")]
    Forbidden { role: String },

    /// Malformed or wrongly signed token outside the guard (activation)
    #[error("Json web token is invalid, try again")]
    InvalidToken,

    /// Token lifetime elapsed outside the guard (activation)
    #[error("Json web token has expired, try again")]
    ExpiredToken,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Invalid activation code")]
    InvalidActivationCode,

    #[error("Please enter email and password")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please enter both old and new passwords")]
    MissingPasswords,

    /// Social accounts have no password to compare against
    #[error("User not found or invalid")]
    PasswordNotSet,

    #[error("Old password is incorrect")]
    IncorrectOldPassword,

    #[error("User not found")]
    UserNotFound,

    /// Input rejected by a value object (email format, password policy, role)
    #[error("{0}")]
    Validation(String),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Session store error: {0}")]
    Store(#[from] KvError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthenticated(_) | AuthError::SessionExpired => ErrorKind::Unauthorized,
            AuthError::Forbidden { .. } => ErrorKind::Forbidden,
            AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::EmailTaken
            | AuthError::InvalidActivationCode
            | AuthError::MissingCredentials
            | AuthError::InvalidCredentials
            | AuthError::MissingPasswords
            | AuthError::PasswordNotSet
            | AuthError::IncorrectOldPassword
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(e) => AppError::from_database(e).kind(),
            AuthError::Mail(_) | AuthError::Store(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Driver errors take the shared Postgres mapping, so a unique-key
    /// violation reaches the client as a 400 rather than a 500.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(e) => AppError::from_database(e),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Store(e) => {
                tracing::error!(error = %e, "Session store error");
            }
            AuthError::Mail(e) => {
                tracing::error!(error = %e, "Mail enqueue failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Forbidden { role } => {
                tracing::warn!(role = %role, "Role rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::Validation(err.message().to_string())
        }
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
        assert_eq!(
            AuthError::Unauthenticated("Please login to access this resource").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::SessionExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Forbidden { role: "user".into() }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_forbidden_message_names_role() {
        let err = AuthError::Forbidden { role: "user".into() };
        assert_eq!(
            err.to_string(),
            "Role: user is not allowed to access this resource"
        );
    }

    #[test]
    fn test_from_app_error() {
        let err: AuthError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "Invalid email format"));

        let err: AuthError = AppError::internal("hash failed").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_unique_violation_is_bad_request() {
        let err = AuthError::from(unique_violation("users_email_key"));

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let app = err.to_app_error();
        assert_eq!(app.client_message(), "Duplicate users_email_key entered");
    }

    #[test]
    fn test_unreadable_database_error_stays_masked() {
        let err = AuthError::from(sqlx::Error::Protocol("bad frame".into()));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_app_error().client_message(), "Internal server error");
    }
}
