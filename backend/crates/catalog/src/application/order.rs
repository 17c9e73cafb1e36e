//! Order Use Cases

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::{Principal, SessionManager};
use chrono::Utc;
use platform::mail::{Mailer, OutgoingMail};

use crate::application::discussion::parse_course_id;
use crate::domain::entities::{Notification, Order};
use crate::domain::repository::{CourseRepository, NotificationRepository, OrderRepository};
use crate::error::{CatalogError, CatalogResult};

pub struct CreateOrderInput {
    pub course_id: String,
    pub payment_info: Option<serde_json::Value>,
}

/// Purchase a course
///
/// The entitlement is written to the user record and to the live session
/// record, so the buyer can open the content without logging in again.
/// The confirmation mail is best effort once the order exists.
pub struct CreateOrderUseCase<R, U>
where
    R: CourseRepository + OrderRepository + NotificationRepository,
    U: UserRepository,
{
    repo: Arc<R>,
    users: Arc<U>,
    sessions: SessionManager,
    mailer: Mailer,
}

impl<R, U> CreateOrderUseCase<R, U>
where
    R: CourseRepository + OrderRepository + NotificationRepository,
    U: UserRepository,
{
    pub fn new(repo: Arc<R>, users: Arc<U>, sessions: SessionManager, mailer: Mailer) -> Self {
        Self {
            repo,
            users,
            sessions,
            mailer,
        }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        input: CreateOrderInput,
    ) -> CatalogResult<Order> {
        let course_id = parse_course_id(&input.course_id)?;

        let mut user = self
            .users
            .find_by_id(&principal.id)
            .await?
            .ok_or(CatalogError::UserNotFound)?;
        if user.owns_course(&course_id) {
            return Err(CatalogError::AlreadyPurchased);
        }

        let mut course = CourseRepository::find_by_id(self.repo.as_ref(), &course_id)
            .await?
            .ok_or(CatalogError::CourseNotFound)?;

        let order = Order::new(course.id, user.id, input.payment_info);
        OrderRepository::create(self.repo.as_ref(), &order).await?;

        user.grant_course(course.id);
        self.users.update(&user).await?;
        self.sessions
            .sync_session(&Principal::from(&user))
            .await?;

        // The order is committed at this point; a lost mail must not undo it
        let short_id: String = course.id.to_string().chars().take(6).collect();
        let confirmation = OutgoingMail::new(
            user.email.as_str(),
            "Order Confirmation",
            "order-confirmation",
            serde_json::json!({
                "order": {
                    "_id": short_id,
                    "name": course.name,
                    "price": course.price,
                    "date": Utc::now().format("%B %-d, %Y").to_string(),
                }
            }),
        );
        if let Err(err) = self.mailer.send(confirmation).await {
            tracing::warn!(
                order_id = %order.id,
                error = %err,
                "Order confirmation mail was not queued"
            );
        }

        NotificationRepository::create(
            self.repo.as_ref(),
            &Notification::new(
                user.id,
                "New Order",
                format!("You have a new order from {}", course.name),
            ),
        )
        .await?;

        course.record_purchase();
        CourseRepository::update(self.repo.as_ref(), &course).await?;

        tracing::info!(
            order_id = %order.id,
            course_id = %course.id,
            user_id = %user.id,
            "Order created"
        );
        Ok(order)
    }
}

pub struct ListOrdersUseCase<R>
where
    R: OrderRepository,
{
    repo: Arc<R>,
}

impl<R> ListOrdersUseCase<R>
where
    R: OrderRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> CatalogResult<Vec<Order>> {
        self.repo.list_newest_first().await
    }
}
