//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Course and its content, Order, Notification)
//! - Domain value objects (Rating, NotificationStatus)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod value_objects;
