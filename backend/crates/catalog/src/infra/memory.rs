//! In-memory catalog repository for tests and local runs without a database

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{CourseId, NotificationId};
use tokio::sync::RwLock;

use crate::domain::entities::{Course, Notification, Order};
use crate::domain::repository::{CourseRepository, NotificationRepository, OrderRepository};
use crate::domain::value_objects::NotificationStatus;
use crate::error::{CatalogError, CatalogResult};

#[derive(Clone, Default)]
pub struct InMemoryCatalogRepository {
    courses: Arc<RwLock<HashMap<CourseId, Course>>>,
    orders: Arc<RwLock<Vec<Order>>>,
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CourseRepository for InMemoryCatalogRepository {
    async fn create(&self, course: &Course) -> CatalogResult<()> {
        self.courses.write().await.insert(course.id, course.clone());
        Ok(())
    }

    async fn find_by_id(&self, course_id: &CourseId) -> CatalogResult<Option<Course>> {
        Ok(self.courses.read().await.get(course_id).cloned())
    }

    async fn list(&self) -> CatalogResult<Vec<Course>> {
        let mut courses: Vec<Course> = self.courses.read().await.values().cloned().collect();
        courses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(courses)
    }

    async fn list_newest_first(&self) -> CatalogResult<Vec<Course>> {
        let mut courses: Vec<Course> = self.courses.read().await.values().cloned().collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }

    async fn update(&self, course: &Course) -> CatalogResult<()> {
        match self.courses.write().await.get_mut(&course.id) {
            Some(existing) => {
                *existing = course.clone();
                Ok(())
            }
            None => Err(CatalogError::CourseNotFound),
        }
    }

    async fn delete(&self, course_id: &CourseId) -> CatalogResult<bool> {
        Ok(self.courses.write().await.remove(course_id).is_some())
    }
}

impl OrderRepository for InMemoryCatalogRepository {
    async fn create(&self, order: &Order) -> CatalogResult<()> {
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn list_newest_first(&self) -> CatalogResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.read().await.iter().rev().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

impl NotificationRepository for InMemoryCatalogRepository {
    async fn create(&self, notification: &Notification) -> CatalogResult<()> {
        self.notifications.write().await.push(notification.clone());
        Ok(())
    }

    async fn list_newest_first(&self) -> CatalogResult<Vec<Notification>> {
        let mut notifications: Vec<Notification> =
            self.notifications.read().await.iter().rev().cloned().collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn mark_read(&self, notification_id: &NotificationId) -> CatalogResult<bool> {
        let mut notifications = self.notifications.write().await;
        match notifications.iter_mut().find(|n| &n.id == notification_id) {
            Some(notification) => {
                notification.status = NotificationStatus::Read;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
