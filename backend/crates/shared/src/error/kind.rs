//! Error Kind
//!
//! The status classes a failure can end up in.

use serde::Serialize;

/// Every crate error (`AuthError`, `CatalogError`, `KvError` via those) is
/// reduced to one of these before it reaches the client.
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Forbidden.status_code(), 403);
/// assert!(ErrorKind::ServiceUnavailable.is_server_error());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed input, failed validation, duplicate email, wrong code
    BadRequest,
    /// No session, or a token that does not verify
    Unauthorized,
    /// Authenticated, but the role is not allowed
    Forbidden,
    /// Unknown record, or content the caller has not purchased
    NotFound,
    InternalServerError,
    /// Database or key-value store unreachable
    ServiceUnavailable,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::InternalServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Reason phrase, used in logs and `Display`
    #[inline]
    pub const fn reason(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// 5xx: the message stays in the logs and never reaches the client
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_failures_are_client_errors() {
        assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert!(!ErrorKind::Unauthorized.is_server_error());
    }

    #[test]
    fn test_store_failures_are_server_errors() {
        assert!(ErrorKind::InternalServerError.is_server_error());
        assert!(ErrorKind::ServiceUnavailable.is_server_error());
        assert_eq!(ErrorKind::ServiceUnavailable.to_string(), "Service Unavailable");
    }
}
