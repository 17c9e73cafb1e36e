//! HTTP Handlers

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use kernel::error::app_error::AppError;
use kernel::extract::Json;
use kernel::response::Envelope;
use platform::cookie::{extract_cookie, set_cookie_header};
use platform::mail::Mailer;

use crate::application::config::REFRESH_COOKIE;
use crate::application::session::SessionManager;
use crate::application::{
    ActivateInput, ActivateUseCase, DeleteUserUseCase, ListUsersUseCase, LoginInput,
    LoginOutput, LoginUseCase, MeUseCase, RegisterInput, RegisterUseCase, SocialAuthInput,
    SocialAuthUseCase, UpdatePasswordInput, UpdatePasswordUseCase, UpdateUserInfoInput,
    UpdateUserInfoUseCase, UpdateUserRoleUseCase,
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ActivationRequest, ExpiresIn, LoginRequest, LoginResponse, MessageResponse, RefreshResponse,
    RegistrationRequest, RegistrationResponse, SocialAuthRequest, UpdatePasswordRequest,
    UpdateUserInfoRequest, UpdateUserRoleRequest, UserResponse, UsersResponse,
};
use crate::presentation::extractor::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub sessions: SessionManager,
    pub mailer: Mailer,
}

// ============================================================================
// Registration
// ============================================================================

/// POST /api/v1/registration
pub async fn registration<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegistrationRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.sessions.tokens().clone(),
        state.mailer.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Envelope::ok(RegistrationResponse {
            message: format!(
                "Please check your email: {} to activate your account!",
                output.email
            ),
            activation_token: output.activation_token,
        }),
    ))
}

/// POST /api/v1/activate-user
pub async fn activate_user<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<ActivationRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ActivateUseCase::new(state.repo.clone(), state.sessions.tokens().clone());

    use_case
        .execute(ActivateInput {
            activation_token: req.activation_token,
            activation_code: req.activation_code,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Envelope::ok(MessageResponse::new(
            "User activated and created successfully!",
        )),
    ))
}

// ============================================================================
// Login / Refresh / Logout
// ============================================================================

/// POST /api/v1/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.sessions.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    session_response(&state.sessions, output)
}

/// POST /api/v1/social-auth
pub async fn social_auth<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SocialAuthRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SocialAuthUseCase::new(state.repo.clone(), state.sessions.clone());

    let output = use_case
        .execute(SocialAuthInput {
            email: req.email,
            name: req.name,
            avatar: req.avatar,
        })
        .await?;

    session_response(&state.sessions, output)
}

/// GET /api/v1/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, REFRESH_COOKIE).ok_or(AuthError::SessionExpired)?;

    let (issued, _) = state.sessions.refresh_session(&token).await?;
    let cookies = cookie_headers(state.sessions.session_cookies(&issued))?;

    Ok((
        cookies,
        Envelope::ok(RefreshResponse {
            access_token: issued.access_token,
        }),
    ))
}

/// GET /api/v1/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(principal): CurrentUser,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    state.sessions.revoke_session(&principal.id).await?;
    let cookies = cookie_headers(state.sessions.cleared_cookies())?;

    tracing::info!(user_id = %principal.id, "User logged out");

    Ok((
        cookies,
        Envelope::ok(MessageResponse::new("Logged out successfully")),
    ))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/v1/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(principal): CurrentUser,
) -> AuthResult<Envelope<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = MeUseCase::new(state.repo.clone())
        .execute(&principal.id)
        .await?;

    Ok(Envelope::ok(UserResponse { user }))
}

/// PUT /api/v1/update-user-info
pub async fn update_user_info<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<UpdateUserInfoRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateUserInfoUseCase::new(state.repo.clone(), state.sessions.clone());

    let user = use_case
        .execute(
            &principal.id,
            UpdateUserInfoInput {
                name: req.name,
                email: req.email,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Envelope::ok(UserResponse { user })))
}

/// PUT /api/v1/update-user-password
pub async fn update_user_password<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<UpdatePasswordRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdatePasswordUseCase::new(state.repo.clone(), state.sessions.clone());

    let user = use_case
        .execute(
            &principal.id,
            UpdatePasswordInput {
                old_password: req.old_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Envelope::ok(UserResponse { user })))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/v1/get-users
pub async fn get_users<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Envelope<UsersResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let users = ListUsersUseCase::new(state.repo.clone()).execute().await?;
    Ok(Envelope::ok(UsersResponse { users }))
}

/// PUT /api/v1/update-user-role
pub async fn update_user_role<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<UpdateUserRoleRequest>,
) -> AuthResult<Envelope<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&req.id)?;

    let user = UpdateUserRoleUseCase::new(state.repo.clone(), state.sessions.clone())
        .execute(&user_id, &req.role)
        .await?;

    Ok(Envelope::ok(UserResponse { user }))
}

/// DELETE /api/v1/delete-user/{id}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(admin): CurrentUser,
    Path(id): Path<String>,
) -> AuthResult<Envelope<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;

    DeleteUserUseCase::new(state.repo.clone(), state.sessions.clone())
        .execute(&user_id)
        .await?;

    tracing::info!(user_id = %user_id, admin_id = %admin.id, "User deleted");
    Ok(Envelope::ok(MessageResponse::new(
        "User deleted successfully",
    )))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn session_response(
    sessions: &SessionManager,
    output: LoginOutput,
) -> AuthResult<(HeaderMap, Envelope<LoginResponse>)> {
    let cookies = cookie_headers(sessions.session_cookies(&output.session))?;
    let config = sessions.config();

    Ok((
        cookies,
        Envelope::ok(LoginResponse {
            user: output.principal,
            access_token: output.session.access_token,
            refresh_token: output.session.refresh_token,
            expires_in: ExpiresIn {
                access_token: config.access_ttl_secs,
                refresh_token: config.refresh_ttl_secs,
            },
        }),
    ))
}

fn cookie_headers(cookies: [String; 2]) -> AuthResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    for cookie in cookies {
        let value = set_cookie_header(&cookie)
            .ok_or_else(|| AuthError::Internal("Invalid Set-Cookie value".to_string()))?;
        headers.append(header::SET_COOKIE, value);
    }
    Ok(headers)
}

/// Malformed ids surface as `Resource not found. Invalid: id`
fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    Ok(raw.parse::<UserId>().map_err(AppError::from)?)
}
