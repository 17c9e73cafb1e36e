//! Application Layer
//!
//! Use cases and application services.

pub mod admin;
pub mod config;
pub mod guard;
pub mod login;
pub mod profile;
pub mod register;
pub mod session;
pub mod token;

// Re-exports
pub use admin::{DeleteUserUseCase, ListUsersUseCase, UpdateUserRoleUseCase};
pub use config::AuthConfig;
pub use guard::{authenticate, ensure_role};
pub use login::{LoginInput, LoginOutput, LoginUseCase, SocialAuthInput, SocialAuthUseCase};
pub use profile::{
    MeUseCase, UpdatePasswordInput, UpdatePasswordUseCase, UpdateUserInfoInput,
    UpdateUserInfoUseCase,
};
pub use register::{ActivateInput, ActivateUseCase, RegisterInput, RegisterOutput, RegisterUseCase};
pub use session::{IssuedSession, SessionManager};
pub use token::{TokenError, TokenService};
