//! Notification Use Cases

use std::sync::Arc;

use kernel::id::NotificationId;

use crate::domain::entities::Notification;
use crate::domain::repository::NotificationRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct ListNotificationsUseCase<R>
where
    R: NotificationRepository,
{
    repo: Arc<R>,
}

impl<R> ListNotificationsUseCase<R>
where
    R: NotificationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> CatalogResult<Vec<Notification>> {
        self.repo.list_newest_first().await
    }
}

/// Mark one notification read and return the refreshed list
pub struct MarkNotificationReadUseCase<R>
where
    R: NotificationRepository,
{
    repo: Arc<R>,
}

impl<R> MarkNotificationReadUseCase<R>
where
    R: NotificationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, notification_id: &NotificationId) -> CatalogResult<Vec<Notification>> {
        if !self.repo.mark_read(notification_id).await? {
            return Err(CatalogError::NotificationNotFound);
        }
        self.repo.list_newest_first().await
    }
}
