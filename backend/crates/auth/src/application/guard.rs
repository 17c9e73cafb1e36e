//! Authentication Guard and Authorization Gate

use crate::application::session::SessionManager;
use crate::domain::entity::principal::Principal;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

pub(crate) const LOGIN_REQUIRED: &str = "Please login to access this resource";
const TOKEN_INVALID: &str = "Access token is not valid";
const SESSION_GONE: &str = "Session not found, please login again";

/// Resolve an access token to the principal of its live session
///
/// A store failure is treated as "not authenticated" and never retried.
pub async fn authenticate(
    sessions: &SessionManager,
    access_token: Option<&str>,
) -> AuthResult<Principal> {
    let token = access_token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::Unauthenticated(LOGIN_REQUIRED))?;

    let claims = sessions.tokens().verify_access_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        AuthError::Unauthenticated(TOKEN_INVALID)
    })?;

    match sessions.load_session(&claims.id).await {
        Ok(Some(principal)) => Ok(principal),
        Ok(None) => Err(AuthError::Unauthenticated(SESSION_GONE)),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %claims.id, "Session lookup failed");
            Err(AuthError::Unauthenticated(SESSION_GONE))
        }
    }
}

/// Pass when the principal's role is on the allow-list
pub fn ensure_role(principal: &Principal, allowed: &[UserRole]) -> AuthResult<()> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            role: principal.role.to_string(),
        })
    }
}
