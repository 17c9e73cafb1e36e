//! Current-user extractor

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::application::guard::LOGIN_REQUIRED;
use crate::domain::entity::principal::Principal;
use crate::error::AuthError;

/// The principal attached by the `authenticate` middleware
///
/// Using it on a route without that middleware always yields 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::Unauthenticated(LOGIN_REQUIRED))
    }
}
