//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extractor::CurrentUser;
pub use handlers::AuthAppState;
pub use middleware::{AllowedRoles, authenticate, authorize_roles};
pub use router::{auth_router, auth_router_generic};
