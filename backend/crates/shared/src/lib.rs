//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the marketplace vocabulary:
//! - Common error types and result aliases
//! - Typed entity IDs
//! - The JSON response envelope (`{ success, ... }`)
//! - A JSON body extractor that rejects in that envelope
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
pub mod response;
