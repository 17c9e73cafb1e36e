//! Profile Use Cases
//!
//! Reads go to the durable store; every mutation rewrites the session record
//! so the guard sees the new snapshot on the next request.

use std::sync::Arc;

use crate::application::session::SessionManager;
use crate::domain::entity::{principal::Principal, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

async fn load_user<R: UserRepository>(repo: &R, user_id: &UserId) -> AuthResult<User> {
    repo.find_by_id(user_id).await?.ok_or(AuthError::UserNotFound)
}

pub struct MeUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> MeUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<Principal> {
        let user = load_user(self.repo.as_ref(), user_id).await?;
        Ok(Principal::from(&user))
    }
}

pub struct UpdateUserInfoInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub struct UpdateUserInfoUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    sessions: SessionManager,
}

impl<R> UpdateUserInfoUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, sessions: SessionManager) -> Self {
        Self { repo, sessions }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        input: UpdateUserInfoInput,
    ) -> AuthResult<Principal> {
        let mut user = load_user(self.repo.as_ref(), user_id).await?;

        if let Some(email) = input.email.filter(|e| !e.trim().is_empty()) {
            let email = Email::new(email)?;
            if self.repo.exists_by_email(&email).await? {
                return Err(AuthError::EmailTaken);
            }
            user.set_email(email);
        }

        if let Some(name) = input.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            user.set_name(name);
        }

        self.repo.update(&user).await?;

        let principal = Principal::from(&user);
        self.sessions.sync_session(&principal).await?;
        Ok(principal)
    }
}

pub struct UpdatePasswordInput {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

pub struct UpdatePasswordUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    sessions: SessionManager,
}

impl<R> UpdatePasswordUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, sessions: SessionManager) -> Self {
        Self { repo, sessions }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        input: UpdatePasswordInput,
    ) -> AuthResult<Principal> {
        let (Some(old_password), Some(new_password)) = (
            input.old_password.filter(|p| !p.is_empty()),
            input.new_password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::MissingPasswords);
        };

        let mut user = load_user(self.repo.as_ref(), user_id).await?;
        let current = user.password.as_ref().ok_or(AuthError::PasswordNotSet)?;

        if !current.verify(&RawPassword::candidate(old_password)) {
            return Err(AuthError::IncorrectOldPassword);
        }

        let raw = RawPassword::new(new_password)?;
        user.set_password(UserPassword::from_raw(&raw)?);
        self.repo.update(&user).await?;

        let principal = Principal::from(&user);
        self.sessions.sync_session(&principal).await?;

        tracing::info!(user_id = %user.id, "Password updated");
        Ok(principal)
    }
}
