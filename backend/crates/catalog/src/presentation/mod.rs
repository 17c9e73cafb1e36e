//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router. Authentication and role checks come
//! from the auth crate's middleware.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{CatalogAppState, CatalogStore};
pub use router::{catalog_router, catalog_router_generic};
