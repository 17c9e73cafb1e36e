//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::sync::Arc;

use auth::{AuthConfig, PgUserRepository, SessionManager, auth_router};
use axum::{
    Router,
    http::{self, Method, Uri, header},
    routing::get,
};
use catalog::{PgCatalogRepository, ReadThroughCache, catalog_router};
use kernel::response::Envelope;
use platform::kv::{KvStore, RedisStore, RetryPolicy};
use platform::mail::Mailer;
use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Everything the routers share, built once at startup
#[derive(Clone)]
struct AppContext {
    kv: KvStore,
    pool: PgPool,
    mailer: Mailer,
    auth_config: Arc<AuthConfig>,
}

impl AppContext {
    async fn connect(config: &ApiConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await?;

        tracing::info!("Connected to database");

        let kv = match &config.redis_uri {
            Some(uri) => KvStore::Redis(RedisStore::connect(uri, RetryPolicy::default()).await?),
            None => {
                tracing::warn!("REDIS_URI not set, sessions and cache live in process memory");
                KvStore::memory()
            }
        };

        Ok(Self {
            kv,
            pool,
            mailer: Mailer::spawn_log_delivery(),
            auth_config: Arc::new(config.auth_config()?),
        })
    }

    fn router(&self) -> Router {
        let sessions = SessionManager::new(self.kv.clone(), self.auth_config.clone());
        let users = PgUserRepository::new(self.pool.clone());

        let auth = auth_router(users.clone(), sessions.clone(), self.mailer.clone());
        let catalog = catalog_router(
            PgCatalogRepository::new(self.pool.clone()),
            users,
            sessions,
            ReadThroughCache::new(self.kv.clone()),
            self.mailer.clone(),
        );

        Router::new()
            .route("/test", get(health))
            .nest("/api/v1", auth.merge(catalog))
            .fallback(route_not_found)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    message: &'static str,
}

async fn health() -> Envelope<HealthResponse> {
    Envelope::ok(HealthResponse {
        message: "API IS WORKING",
    })
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {} not found", uri.path()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "api=info,auth=info,catalog=info,platform=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    let context = AppContext::connect(&config).await?;

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&context.pool)
        .await?;

    tracing::info!(kv = context.kv.backend_name(), "Migrations completed");

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = context
        .router()
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = config.addr();
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    context.pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}
