//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Users, principals, repository traits
//! - `application/` - Token service, session manager, guards, use cases
//! - `infra/` - Postgres and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Session Model
//! - Short-lived access token and long-lived refresh token, HS256, each
//!   with its own secret, delivered as HTTP-only cookies
//! - The serialized principal lives in the key-value store under the user
//!   id with TTL = refresh lifetime; its presence is what the guard trusts
//! - Every refresh rotates both tokens and rewrites the record
//! - Logout and account deletion delete the record, which invalidates
//!   outstanding access tokens immediately

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session::SessionManager;
pub use domain::entity::principal::Principal;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::extractor::CurrentUser;
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::domain::repository::UserRepository;
    pub use crate::infra::postgres::PgUserRepository as UserStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
