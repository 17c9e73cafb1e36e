//! PostgreSQL Repository Implementations
//!
//! Courses are stored as a JSONB document next to a few indexed columns;
//! orders and notifications are plain rows.

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, NotificationId};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entities::{Course, Notification, Order};
use crate::domain::repository::{CourseRepository, NotificationRepository, OrderRepository};
use crate::domain::value_objects::NotificationStatus;
use crate::error::{CatalogError, CatalogResult};

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Course Repository Implementation
// ============================================================================

impl CourseRepository for PgCatalogRepository {
    async fn create(&self, course: &Course) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(Json(course))
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, course_id: &CourseId) -> CatalogResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>("SELECT document FROM courses WHERE id = $1")
            .bind(course_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CourseRow::into_course))
    }

    async fn list(&self) -> CatalogResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            "SELECT document FROM courses ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CourseRow::into_course).collect())
    }

    async fn list_newest_first(&self) -> CatalogResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            "SELECT document FROM courses ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CourseRow::into_course).collect())
    }

    async fn update(&self, course: &Course) -> CatalogResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE courses SET
                document = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(Json(course))
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(CatalogError::CourseNotFound);
        }
        Ok(())
    }

    async fn delete(&self, course_id: &CourseId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Order Repository Implementation
// ============================================================================

impl OrderRepository for PgCatalogRepository {
    async fn create(&self, order: &Order) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, course_id, user_id, payment_info, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.course_id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.payment_info.as_ref().map(Json))
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_newest_first(&self) -> CatalogResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, course_id, user_id, payment_info, created_at
            FROM orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderRow::into_order).collect())
    }
}

// ============================================================================
// Notification Repository Implementation
// ============================================================================

impl NotificationRepository for PgCatalogRepository {
    async fn create(&self, notification: &Notification) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, title, message, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(notification.user_id.as_uuid())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.status.as_str())
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_newest_first(&self) -> CatalogResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, title, message, status, created_at
            FROM notifications
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(NotificationRow::into_notification).collect()
    }

    async fn mark_read(&self, notification_id: &NotificationId) -> CatalogResult<bool> {
        let updated = sqlx::query("UPDATE notifications SET status = $2 WHERE id = $1")
            .bind(notification_id.as_uuid())
            .bind(NotificationStatus::Read.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(updated > 0)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CourseRow {
    document: Json<Course>,
}

impl CourseRow {
    fn into_course(self) -> Course {
        self.document.0
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    course_id: Uuid,
    user_id: Uuid,
    payment_info: Option<Json<serde_json::Value>>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            id: self.id.into(),
            course_id: self.course_id.into(),
            user_id: self.user_id.into(),
            payment_info: self.payment_info.map(|p| p.0),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> CatalogResult<Notification> {
        let status = self
            .status
            .parse::<NotificationStatus>()
            .map_err(CatalogError::Internal)?;

        Ok(Notification {
            id: self.id.into(),
            user_id: self.user_id.into(),
            title: self.title,
            message: self.message,
            status,
            created_at: self.created_at,
        })
    }
}
