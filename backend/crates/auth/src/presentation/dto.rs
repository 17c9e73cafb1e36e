//! API DTOs (Data Transfer Objects)
//!
//! Response payloads are wrapped in `kernel::response::Envelope`, which adds
//! `"success": true`.

use serde::{Deserialize, Serialize};

use crate::domain::entity::principal::Principal;

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub message: String,
    pub activation_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivationRequest {
    pub activation_token: String,
    pub activation_code: String,
}

// ============================================================================
// Login / Social Auth
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialAuthRequest {
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// Token lifetimes in seconds
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiresIn {
    pub access_token: u64,
    pub refresh_token: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: Principal,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: ExpiresIn,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserInfoRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: Principal,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<Principal>,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRoleRequest {
    pub id: String,
    pub role: String,
}

/// Plain `{ "message": ... }` payload
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
