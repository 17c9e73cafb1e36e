//! HTTP Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::models::MessageResponse;
use auth::{CurrentUser, SessionManager};
use kernel::error::app_error::AppError;
use kernel::extract::Json;
use kernel::id::NotificationId;
use kernel::response::Envelope;
use platform::mail::Mailer;

use crate::application::discussion::parse_course_id;
use crate::application::{
    AddAnswerInput, AddAnswerUseCase, AddQuestionInput, AddQuestionUseCase, AddReviewInput,
    AddReviewReplyInput, AddReviewReplyUseCase, AddReviewUseCase, CreateCourseUseCase,
    CreateOrderInput, CreateOrderUseCase, DeleteCourseUseCase, EditCourseUseCase,
    GetCourseContentUseCase, GetCourseUseCase, ListAllCoursesUseCase, ListCoursesUseCase,
    ListNotificationsUseCase, ListOrdersUseCase, MarkNotificationReadUseCase, ReadThroughCache,
};
use crate::domain::entities::CourseDraft;
use crate::domain::repository::{CourseRepository, NotificationRepository, OrderRepository};
use crate::error::CatalogResult;
use crate::presentation::dto::{
    AddAnswerRequest, AddQuestionRequest, AddReviewReplyRequest, AddReviewRequest,
    ContentResponse, CourseResponse, CoursesResponse, CreateOrderRequest, NotificationsResponse,
    OrderResponse, OrdersResponse,
};

/// Everything the catalog persists, behind one handle
pub trait CatalogStore:
    CourseRepository + OrderRepository + NotificationRepository + Clone + Send + Sync + 'static
{
}

impl<T> CatalogStore for T where
    T: CourseRepository + OrderRepository + NotificationRepository + Clone + Send + Sync + 'static
{
}

/// Shared state for catalog handlers
#[derive(Clone)]
pub struct CatalogAppState<R, U>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub users: Arc<U>,
    pub sessions: SessionManager,
    pub cache: ReadThroughCache,
    pub mailer: Mailer,
}

// ============================================================================
// Courses
// ============================================================================

/// POST /api/v1/create-course
pub async fn create_course<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    Json(draft): Json<CourseDraft>,
) -> CatalogResult<impl IntoResponse>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let course = CreateCourseUseCase::new(state.repo.clone())
        .execute(draft)
        .await?;

    Ok((StatusCode::CREATED, Envelope::ok(CourseResponse { course })))
}

/// PUT /api/v1/edit-course/{id}
pub async fn edit_course<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    Path(id): Path<String>,
    Json(draft): Json<CourseDraft>,
) -> CatalogResult<Envelope<CourseResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;

    let course = EditCourseUseCase::new(state.repo.clone())
        .execute(&course_id, draft)
        .await?;

    Ok(Envelope::ok(CourseResponse { course }))
}

/// GET /api/v1/get-course/{id}
pub async fn get_course<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    Path(id): Path<String>,
) -> CatalogResult<Envelope<CourseResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;

    let course = GetCourseUseCase::new(state.repo.clone(), state.cache.clone())
        .execute(&course_id)
        .await?;

    Ok(Envelope::ok(CourseResponse { course }))
}

/// GET /api/v1/get-courses
pub async fn get_courses<R, U>(
    State(state): State<CatalogAppState<R, U>>,
) -> CatalogResult<Envelope<CoursesResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let courses = ListCoursesUseCase::new(state.repo.clone(), state.cache.clone())
        .execute()
        .await?;

    Ok(Envelope::ok(CoursesResponse { courses }))
}

/// GET /api/v1/get-course-content/{id}
pub async fn get_course_content<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Envelope<ContentResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;

    let content = GetCourseContentUseCase::new(state.repo.clone())
        .execute(&principal, &course_id)
        .await?;

    Ok(Envelope::ok(ContentResponse { content }))
}

/// GET /api/v1/get-all-courses
pub async fn get_all_courses<R, U>(
    State(state): State<CatalogAppState<R, U>>,
) -> CatalogResult<Envelope<CoursesResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let courses = ListAllCoursesUseCase::new(state.repo.clone())
        .execute()
        .await?;

    Ok(Envelope::ok(CoursesResponse { courses }))
}

/// DELETE /api/v1/delete-course/{id}
pub async fn delete_course<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    Path(id): Path<String>,
) -> CatalogResult<Envelope<MessageResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;

    DeleteCourseUseCase::new(state.repo.clone(), state.cache.clone())
        .execute(&course_id)
        .await?;

    Ok(Envelope::ok(MessageResponse::new(
        "Course deleted successfully",
    )))
}

// ============================================================================
// Questions and reviews
// ============================================================================

/// PUT /api/v1/add-question
pub async fn add_question<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<AddQuestionRequest>,
) -> CatalogResult<Envelope<CourseResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let course = AddQuestionUseCase::new(state.repo.clone())
        .execute(
            &principal,
            AddQuestionInput {
                question: req.question,
                course_id: req.course_id,
                content_id: req.content_id,
            },
        )
        .await?;

    Ok(Envelope::ok(CourseResponse { course }))
}

/// PUT /api/v1/add-answer
pub async fn add_answer<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<AddAnswerRequest>,
) -> CatalogResult<Envelope<CourseResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let course = AddAnswerUseCase::new(state.repo.clone(), state.mailer.clone())
        .execute(
            &principal,
            AddAnswerInput {
                answer: req.answer,
                course_id: req.course_id,
                content_id: req.content_id,
                question_id: req.question_id,
            },
        )
        .await?;

    Ok(Envelope::ok(CourseResponse { course }))
}

/// PUT /api/v1/add-review/{id}
pub async fn add_review<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AddReviewRequest>,
) -> CatalogResult<Envelope<CourseResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;

    let course = AddReviewUseCase::new(state.repo.clone())
        .execute(
            &principal,
            &course_id,
            AddReviewInput {
                review: req.review,
                rating: req.rating,
            },
        )
        .await?;

    Ok(Envelope::ok(CourseResponse { course }))
}

/// PUT /api/v1/add-reply
pub async fn add_review_reply<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<AddReviewReplyRequest>,
) -> CatalogResult<Envelope<CourseResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let course = AddReviewReplyUseCase::new(state.repo.clone())
        .execute(
            &principal,
            AddReviewReplyInput {
                comment: req.comment,
                course_id: req.course_id,
                review_id: req.review_id,
            },
        )
        .await?;

    Ok(Envelope::ok(CourseResponse { course }))
}

// ============================================================================
// Orders
// ============================================================================

/// POST /api/v1/create-order
pub async fn create_order<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> CatalogResult<impl IntoResponse>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = CreateOrderUseCase::new(
        state.repo.clone(),
        state.users.clone(),
        state.sessions.clone(),
        state.mailer.clone(),
    );

    let order = use_case
        .execute(
            &principal,
            CreateOrderInput {
                course_id: req.course_id,
                payment_info: req.payment_info,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Envelope::ok(OrderResponse { order })))
}

/// GET /api/v1/get-orders
pub async fn get_orders<R, U>(
    State(state): State<CatalogAppState<R, U>>,
) -> CatalogResult<Envelope<OrdersResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let orders = ListOrdersUseCase::new(state.repo.clone())
        .execute()
        .await?;

    Ok(Envelope::ok(OrdersResponse { orders }))
}

// ============================================================================
// Notifications
// ============================================================================

/// GET /api/v1/get-all-notifications
pub async fn get_notifications<R, U>(
    State(state): State<CatalogAppState<R, U>>,
) -> CatalogResult<Envelope<NotificationsResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let notifications = ListNotificationsUseCase::new(state.repo.clone())
        .execute()
        .await?;

    Ok(Envelope::ok(NotificationsResponse { notifications }))
}

/// PUT /api/v1/update-notification/{id}
pub async fn update_notification<R, U>(
    State(state): State<CatalogAppState<R, U>>,
    Path(id): Path<String>,
) -> CatalogResult<Envelope<NotificationsResponse>>
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let notification_id: NotificationId = id.trim().parse().map_err(AppError::from)?;

    let notifications = MarkNotificationReadUseCase::new(state.repo.clone())
        .execute(&notification_id)
        .await?;

    Ok(Envelope::ok(NotificationsResponse { notifications }))
}
