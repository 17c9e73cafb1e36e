//! Catalog Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::middleware::{AllowedRoles, authenticate, authorize_roles};
use auth::{PgUserRepository, SessionManager};
use platform::mail::Mailer;

use crate::application::cache::ReadThroughCache;
use crate::infra::postgres::PgCatalogRepository;
use crate::presentation::handlers::{self, CatalogAppState, CatalogStore};

/// Create the Catalog router with PostgreSQL repositories
pub fn catalog_router(
    repo: PgCatalogRepository,
    users: PgUserRepository,
    sessions: SessionManager,
    cache: ReadThroughCache,
    mailer: Mailer,
) -> Router {
    catalog_router_generic(repo, users, sessions, cache, mailer)
}

/// Create a generic Catalog router for any repository implementation
pub fn catalog_router_generic<R, U>(
    repo: R,
    users: U,
    sessions: SessionManager,
    cache: ReadThroughCache,
    mailer: Mailer,
) -> Router
where
    R: CatalogStore,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let state = CatalogAppState {
        repo: Arc::new(repo),
        users: Arc::new(users),
        sessions: sessions.clone(),
        cache,
        mailer,
    };

    let public = Router::new()
        .route("/get-course/{id}", get(handlers::get_course::<R, U>))
        .route("/get-courses", get(handlers::get_courses::<R, U>));

    let authed = Router::new()
        .route(
            "/get-course-content/{id}",
            get(handlers::get_course_content::<R, U>),
        )
        .route("/add-question", put(handlers::add_question::<R, U>))
        .route("/add-answer", put(handlers::add_answer::<R, U>))
        .route("/add-review/{id}", put(handlers::add_review::<R, U>))
        .route("/create-order", post(handlers::create_order::<R, U>))
        .route_layer(from_fn_with_state(sessions.clone(), authenticate));

    let admin = Router::new()
        .route("/create-course", post(handlers::create_course::<R, U>))
        .route("/edit-course/{id}", put(handlers::edit_course::<R, U>))
        .route("/add-reply", put(handlers::add_review_reply::<R, U>))
        .route("/get-all-courses", get(handlers::get_all_courses::<R, U>))
        .route("/delete-course/{id}", delete(handlers::delete_course::<R, U>))
        .route("/get-orders", get(handlers::get_orders::<R, U>))
        .route(
            "/get-all-notifications",
            get(handlers::get_notifications::<R, U>),
        )
        .route(
            "/update-notification/{id}",
            put(handlers::update_notification::<R, U>),
        )
        .route_layer(from_fn_with_state(AllowedRoles::ADMIN, authorize_roles))
        .route_layer(from_fn_with_state(sessions, authenticate));

    public.merge(authed).merge(admin).with_state(state)
}
