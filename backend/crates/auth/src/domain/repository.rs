//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user; a taken email fails with `AuthError::EmailTaken`
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// All users, most recently created first
    async fn list_newest_first(&self) -> AuthResult<Vec<User>>;

    /// Persist every mutable field of `user`
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Returns `false` when no such user existed
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;
}
