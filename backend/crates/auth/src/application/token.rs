//! Token Service
//!
//! HS256 tokens for access, refresh and account activation, each signed
//! with its own secret. Expiry is enforced by `jsonwebtoken` itself.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthError;

/// Why a token was rejected
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is invalid")]
    Invalid,
    #[error("token has expired")]
    Expired,
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AuthError::InvalidToken,
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::Signing(e) => AuthError::Internal(e.to_string()),
        }
    }
}

/// Claims of access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub iat: i64,
    pub exp: i64,
    /// Keeps two tokens minted within the same second distinct
    pub jti: Uuid,
}

/// Registration data held until the activation code is confirmed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub name: String,
    pub email: String,
    /// Argon2id PHC string; the clear-text password never enters a token
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationClaims {
    pub user: PendingRegistration,
    pub activation_code: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub fn issue_access_token(&self, user_id: &UserId) -> Result<String, TokenError> {
        let ttl = ttl_as_i64(self.config.access_ttl_secs);
        self.issue_with_ttl(&self.config.access_secret, user_id, ttl)
    }

    pub fn issue_refresh_token(&self, user_id: &UserId) -> Result<String, TokenError> {
        let ttl = ttl_as_i64(self.config.refresh_ttl_secs);
        self.issue_with_ttl(&self.config.refresh_secret, user_id, ttl)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        verify(token, &self.config.access_secret)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        verify(token, &self.config.refresh_secret)
    }

    pub fn issue_activation_token(
        &self,
        user: PendingRegistration,
        activation_code: String,
    ) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let claims = ActivationClaims {
            user,
            activation_code,
            iat,
            exp: iat + ttl_as_i64(self.config.activation_ttl_secs),
        };
        sign(&claims, &self.config.activation_secret)
    }

    pub fn verify_activation_token(&self, token: &str) -> Result<ActivationClaims, TokenError> {
        verify(token, &self.config.activation_secret)
    }

    /// A negative `ttl_secs` yields an already expired token
    pub(crate) fn issue_with_ttl(
        &self,
        secret: &str,
        user_id: &UserId,
        ttl_secs: i64,
    ) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            id: *user_id,
            iat,
            exp: iat + ttl_secs,
            jti: Uuid::new_v4(),
        };
        sign(&claims, secret)
    }
}

fn ttl_as_i64(ttl_secs: u64) -> i64 {
    i64::try_from(ttl_secs).unwrap_or(i64::MAX / 2)
}

fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

fn verify<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}
