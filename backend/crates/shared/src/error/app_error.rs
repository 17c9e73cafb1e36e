//! Application Error
//!
//! [`AppError`] is the single responder: every crate error is converted
//! into it, and its `IntoResponse` (see `conversions`) renders
//! `{ "success": false, "message": ... }`.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Body message for any 5xx response
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// A status class, a client-facing message, and optionally the cause
///
/// The cause is kept for logs only.
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::not_found("Course not found");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.client_message(), "Course not found");
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Attach the underlying cause
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// [`INTERNAL_MESSAGE`] for server errors, the real message otherwise
    pub fn client_message(&self) -> &str {
        if self.kind.is_server_error() {
            INTERNAL_MESSAGE
        } else {
            &self.message
        }
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_server_detail() {
        let err = AppError::internal("connection refused at 10.0.0.3:6379");
        assert_eq!(err.client_message(), INTERNAL_MESSAGE);
        assert_eq!(err.message(), "connection refused at 10.0.0.3:6379");

        let err = AppError::bad_request("Email already exists");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_message(), "Email already exists");
    }

    #[test]
    fn test_source_is_kept_for_logs() {
        let cause = std::io::Error::other("socket closed");
        let err = AppError::service_unavailable("Database unavailable").with_source(cause);

        assert_eq!(err.status_code(), 503);
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("socket closed"));
    }

    #[test]
    fn test_display() {
        let err = AppError::not_found("Course not found");
        assert_eq!(err.to_string(), "[Not Found] Course not found");
    }
}
