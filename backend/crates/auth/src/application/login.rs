//! Login Use Cases
//!
//! Password login and social sign-in both end in `issue_session`.

use std::sync::Arc;

use crate::application::session::{IssuedSession, SessionManager};
use crate::domain::entity::{
    principal::Principal,
    user::{Avatar, User},
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Result of any successful login
pub struct LoginOutput {
    pub principal: Principal,
    pub session: IssuedSession,
}

pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    sessions: SessionManager,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, sessions: SessionManager) -> Self {
        Self { repo, sessions }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let (Some(email), Some(password)) = (
            input.email.filter(|e| !e.trim().is_empty()),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::MissingCredentials);
        };

        let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Social accounts cannot log in with a password
        let stored = user.password.as_ref().ok_or(AuthError::InvalidCredentials)?;
        if !stored.verify(&RawPassword::candidate(password)) {
            return Err(AuthError::InvalidCredentials);
        }

        let principal = Principal::from(&user);
        let session = self.sessions.issue_session(&principal).await?;

        tracing::info!(user_id = %principal.id, "User logged in");
        Ok(LoginOutput { principal, session })
    }
}

pub struct SocialAuthInput {
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// Find-or-create by email, then log in
pub struct SocialAuthUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    sessions: SessionManager,
}

impl<R> SocialAuthUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, sessions: SessionManager) -> Self {
        Self { repo, sessions }
    }

    pub async fn execute(&self, input: SocialAuthInput) -> AuthResult<LoginOutput> {
        let email = Email::new(input.email)?;

        let user = match self.repo.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                let mut user = User::new(input.name.trim(), email, None);
                user.avatar = input.avatar.filter(|url| !url.is_empty()).map(|url| Avatar {
                    public_id: String::new(),
                    url,
                });
                self.repo.create(&user).await?;
                tracing::info!(user_id = %user.id, "User created from social sign-in");
                user
            }
        };

        let principal = Principal::from(&user);
        let session = self.sessions.issue_session(&principal).await?;

        Ok(LoginOutput { principal, session })
    }
}
