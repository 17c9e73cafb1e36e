//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use platform::mail::Mailer;

use crate::application::session::SessionManager;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AllowedRoles, authenticate, authorize_roles};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, sessions: SessionManager, mailer: Mailer) -> Router {
    auth_router_generic(repo, sessions, mailer)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, sessions: SessionManager, mailer: Mailer) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        sessions: sessions.clone(),
        mailer,
    };

    let public = Router::new()
        .route("/registration", post(handlers::registration::<R>))
        .route("/activate-user", post(handlers::activate_user::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", get(handlers::refresh::<R>))
        .route("/social-auth", post(handlers::social_auth::<R>));

    let authed = Router::new()
        .route("/logout", get(handlers::logout::<R>))
        .route("/me", get(handlers::me::<R>))
        .route("/update-user-info", put(handlers::update_user_info::<R>))
        .route(
            "/update-user-password",
            put(handlers::update_user_password::<R>),
        )
        .route_layer(from_fn_with_state(sessions.clone(), authenticate));

    let admin = Router::new()
        .route("/get-users", get(handlers::get_users::<R>))
        .route("/update-user-role", put(handlers::update_user_role::<R>))
        .route("/delete-user/{id}", delete(handlers::delete_user::<R>))
        .route_layer(from_fn_with_state(AllowedRoles::ADMIN, authorize_roles))
        .route_layer(from_fn_with_state(sessions, authenticate));

    public.merge(authed).merge(admin).with_state(state)
}
