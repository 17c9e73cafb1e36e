//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
