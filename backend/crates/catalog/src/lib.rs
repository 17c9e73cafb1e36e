//! Catalog Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Courses, threads, orders, notifications, repository traits
//! - `application/` - Use cases and the read-through cache
//! - `infra/` - Postgres and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Caching
//! - `get-course/{id}` and `get-courses` serve previews from the key-value
//!   store, keyed by course id and `allCourses`, with no expiry
//! - Only course deletion invalidates, and only the per-id entry
//! - Previews never contain video URLs, links, suggestions or questions

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::cache::{ALL_COURSES_KEY, ReadThroughCache};
pub use error::{CatalogError, CatalogResult};
pub use infra::{InMemoryCatalogRepository, PgCatalogRepository};
pub use presentation::router::{catalog_router, catalog_router_generic};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::domain::repository::*;
    pub use crate::infra::postgres::PgCatalogRepository as CatalogStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
