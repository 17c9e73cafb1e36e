//! Registration Use Cases
//!
//! Registration does not touch the user table: the pending account travels
//! inside a short-lived activation token, and only a matching 4-digit code
//! turns it into a stored user.

use std::sync::Arc;

use platform::crypto::activation_code;
use platform::mail::{Mailer, OutgoingMail};

use crate::application::token::{PendingRegistration, TokenService};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterOutput {
    pub email: Email,
    pub activation_token: String,
}

pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: TokenService,
    mailer: Mailer,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: TokenService, mailer: Mailer) -> Self {
        Self {
            repo,
            tokens,
            mailer,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AuthError::Validation("Please enter your name".to_string()));
        }

        let email = Email::new(input.email)?;
        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password)?;

        let code = activation_code();
        let activation_token = self.tokens.issue_activation_token(
            PendingRegistration {
                name: name.clone(),
                email: email.to_string(),
                password_hash: password_hash.as_phc_string().to_string(),
            },
            code.clone(),
        )?;

        self.mailer
            .send(OutgoingMail::new(
                email.as_str(),
                "Activate your account",
                "activation-mail",
                serde_json::json!({ "user": { "name": name }, "activationCode": code }),
            ))
            .await?;

        tracing::info!(email = %email, "Activation mail queued");

        Ok(RegisterOutput {
            email,
            activation_token,
        })
    }
}

pub struct ActivateInput {
    pub activation_token: String,
    pub activation_code: String,
}

pub struct ActivateUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: TokenService,
}

impl<R> ActivateUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: TokenService) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(&self, input: ActivateInput) -> AuthResult<User> {
        let claims = self
            .tokens
            .verify_activation_token(&input.activation_token)?;

        if claims.activation_code != input.activation_code.trim() {
            return Err(AuthError::InvalidActivationCode);
        }

        let email = Email::new(claims.user.email)?;
        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = UserPassword::from_phc_string(claims.user.password_hash)?;
        let user = User::new(claims.user.name, email, Some(password));

        // A concurrent activation loses on the unique email index
        self.repo.create(&user).await?;

        tracing::info!(user_id = %user.id, "User activated");
        Ok(user)
    }
}
