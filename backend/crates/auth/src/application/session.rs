//! Session Manager
//!
//! A session is the serialized [`Principal`] stored in the key-value store
//! under the user's id, with TTL = refresh-token lifetime. Tokens only say
//! *who*; the record decides whether that identity is still logged in.

use std::sync::Arc;

use platform::kv::{KvError, KvStore};

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::entity::principal::Principal;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Freshly minted token pair
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionManager {
    store: KvStore,
    tokens: TokenService,
    config: Arc<AuthConfig>,
}

impl SessionManager {
    pub fn new(store: KvStore, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            tokens: TokenService::new(config.clone()),
            config,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Mint both tokens and write the session record
    pub async fn issue_session(&self, principal: &Principal) -> AuthResult<IssuedSession> {
        let issued = self.mint(&principal.id)?;
        self.sync_session(principal).await?;

        tracing::info!(user_id = %principal.id, "Session issued");
        Ok(issued)
    }

    /// Rotate the token pair and rewrite the record with a full TTL
    ///
    /// Any verification failure or a missing record is `SessionExpired`.
    pub async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> AuthResult<(IssuedSession, Principal)> {
        let claims = self.tokens.verify_refresh_token(refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            AuthError::SessionExpired
        })?;

        let principal = match self.load_session(&claims.id).await {
            Ok(Some(principal)) => principal,
            Ok(None) => return Err(AuthError::SessionExpired),
            Err(e) => {
                tracing::warn!(error = %e, user_id = %claims.id, "Session lookup failed during refresh");
                return Err(AuthError::SessionExpired);
            }
        };

        let issued = self.mint(&principal.id)?;
        self.sync_session(&principal).await?;

        tracing::debug!(user_id = %principal.id, "Session refreshed");
        Ok((issued, principal))
    }

    /// Delete the record; tokens already handed out stop working at the guard
    pub async fn revoke_session(&self, user_id: &UserId) -> AuthResult<()> {
        let removed = self.store.del(&session_key(user_id)).await?;
        tracing::info!(user_id = %user_id, removed, "Session revoked");
        Ok(())
    }

    /// Read the record; an unreadable record counts as absent
    pub async fn load_session(&self, user_id: &UserId) -> Result<Option<Principal>, KvError> {
        let Some(raw) = self.store.get(&session_key(user_id)).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Principal>(&raw) {
            Ok(principal) => Ok(Some(principal)),
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user_id, "Discarding unreadable session record");
                Ok(None)
            }
        }
    }

    /// Write `principal` as the record, TTL = refresh-token lifetime
    pub async fn sync_session(&self, principal: &Principal) -> AuthResult<()> {
        let json = serde_json::to_string(principal)
            .map_err(|e| AuthError::Internal(format!("Session serialization failed: {e}")))?;

        self.store
            .set_ex(&session_key(&principal.id), &json, self.config.refresh_ttl_secs)
            .await?;
        Ok(())
    }

    /// `Set-Cookie` values for both tokens
    pub fn session_cookies(&self, issued: &IssuedSession) -> [String; 2] {
        [
            self.config
                .access_cookie()
                .build_set_cookie(&issued.access_token),
            self.config
                .refresh_cookie()
                .build_set_cookie(&issued.refresh_token),
        ]
    }

    /// `Set-Cookie` values expiring both tokens immediately
    pub fn cleared_cookies(&self) -> [String; 2] {
        [
            self.config.access_cookie().build_delete_cookie(),
            self.config.refresh_cookie().build_delete_cookie(),
        ]
    }

    fn mint(&self, user_id: &UserId) -> AuthResult<IssuedSession> {
        Ok(IssuedSession {
            access_token: self.tokens.issue_access_token(user_id)?,
            refresh_token: self.tokens.issue_refresh_token(user_id)?,
        })
    }

    pub(crate) fn store(&self) -> &KvStore {
        &self.store
    }
}

/// Records are keyed by the bare user id
fn session_key(user_id: &UserId) -> String {
    user_id.to_string()
}
