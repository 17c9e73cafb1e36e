//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{CourseId, NotificationId};

use crate::domain::entities::{Course, Notification, Order};
use crate::error::CatalogResult;

/// Course repository trait
///
/// A course is read and written as a whole document.
#[trait_variant::make(CourseRepository: Send)]
pub trait LocalCourseRepository {
    async fn create(&self, course: &Course) -> CatalogResult<()>;

    async fn find_by_id(&self, course_id: &CourseId) -> CatalogResult<Option<Course>>;

    /// Catalog order (oldest first)
    async fn list(&self) -> CatalogResult<Vec<Course>>;

    async fn list_newest_first(&self) -> CatalogResult<Vec<Course>>;

    async fn update(&self, course: &Course) -> CatalogResult<()>;

    /// Returns `false` when no such course existed
    async fn delete(&self, course_id: &CourseId) -> CatalogResult<bool>;
}

/// Order repository trait
#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    async fn create(&self, order: &Order) -> CatalogResult<()>;

    async fn list_newest_first(&self) -> CatalogResult<Vec<Order>>;
}

/// Notification repository trait
#[trait_variant::make(NotificationRepository: Send)]
pub trait LocalNotificationRepository {
    async fn create(&self, notification: &Notification) -> CatalogResult<()>;

    async fn list_newest_first(&self) -> CatalogResult<Vec<Notification>>;

    /// Returns `false` when no such notification existed
    async fn mark_read(&self, notification_id: &NotificationId) -> CatalogResult<bool>;
}
