//! Admin Use Cases

use std::sync::Arc;

use crate::application::session::SessionManager;
use crate::domain::entity::principal::Principal;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

pub struct ListUsersUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> ListUsersUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> AuthResult<Vec<Principal>> {
        let users = self.repo.list_newest_first().await?;
        Ok(users.iter().map(Principal::from).collect())
    }
}

pub struct UpdateUserRoleUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    sessions: SessionManager,
}

impl<R> UpdateUserRoleUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, sessions: SessionManager) -> Self {
        Self { repo, sessions }
    }

    pub async fn execute(&self, user_id: &UserId, role: &str) -> AuthResult<Principal> {
        let role: UserRole = role.parse().map_err(AuthError::Validation)?;

        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        user.set_role(role);
        self.repo.update(&user).await?;

        let principal = Principal::from(&user);

        // A logged-in user picks up the new role without logging in again
        if self.sessions.load_session(user_id).await?.is_some() {
            self.sessions.sync_session(&principal).await?;
        }

        tracing::info!(user_id = %user_id, role = %role, "User role updated");
        Ok(principal)
    }
}

pub struct DeleteUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    sessions: SessionManager,
}

impl<R> DeleteUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, sessions: SessionManager) -> Self {
        Self { repo, sessions }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        if !self.repo.delete(user_id).await? {
            return Err(AuthError::UserNotFound);
        }
        self.sessions.revoke_session(user_id).await?;

        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}
