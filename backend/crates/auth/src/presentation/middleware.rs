//! Auth Middleware
//!
//! `authenticate` resolves the access-token cookie to a [`Principal`] and
//! stores it in the request extensions. `authorize_roles` must be layered
//! inside it and reads that principal back.
//!
//! ```ignore
//! Router::new()
//!     .route("/get-users", get(handler))
//!     .route_layer(from_fn_with_state(AllowedRoles::ADMIN, authorize_roles))
//!     .route_layer(from_fn_with_state(sessions, authenticate));
//! ```

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use platform::cookie::extract_cookie;

use crate::application::config::ACCESS_COOKIE;
use crate::application::guard;
use crate::application::session::SessionManager;
use crate::domain::entity::principal::Principal;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// Require a live session; attaches the principal for downstream handlers
pub async fn authenticate(
    State(sessions): State<SessionManager>,
    mut req: Request,
    next: Next,
) -> AuthResult<Response> {
    let token = extract_cookie(req.headers(), ACCESS_COOKIE);
    let principal = guard::authenticate(&sessions, token.as_deref()).await?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Role allow-list for [`authorize_roles`]
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [UserRole]);

impl AllowedRoles {
    pub const ADMIN: Self = Self(&[UserRole::Admin]);
}

/// Reject principals whose role is not on the allow-list
pub async fn authorize_roles(
    State(allowed): State<AllowedRoles>,
    req: Request,
    next: Next,
) -> AuthResult<Response> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or(AuthError::Unauthenticated(guard::LOGIN_REQUIRED))?;

    guard::ensure_role(principal, allowed.0)?;
    Ok(next.run(req).await)
}
