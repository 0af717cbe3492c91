//! # bookmarkd: a personal bookmark service
//!
//! `bookmarkd` stores links for its users behind token authentication. Anyone can sign up with an
//! email and password; every bookmark belongs to exactly one user and only that user can see or
//! change it.
//!
//! ## Architecture
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum). Persistence goes through two store
//! traits ([`db::store::UserStore`] and [`db::store::BookmarkStore`]) with a PostgreSQL backend for
//! production and an in-memory backend for development and tests.
//!
//! ### Request Flow
//!
//! 1. `/auth/signup` and `/auth/signin` check credentials (Argon2 digests, see
//!    [`auth::password`]) and return a signed, short-lived access token ([`auth::session`]).
//! 2. Every other API route takes a [`CurrentUser`](api::models::users::CurrentUser) argument. The
//!    extractor in [`auth::current_user`] validates the bearer token and resolves its subject, or
//!    rejects the request with 401.
//! 3. Bookmark handlers apply the ownership rules in [`auth::ownership`] before touching data.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use bookmarkd::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = bookmarkd::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     config.validate()?;
//!
//!     bookmarkd::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```
//!
//! ## Database Setup
//!
//! With an external database, migrations run on startup. They can also be run directly:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! bookmarkd::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test;
#[cfg(test)]
pub mod test_utils;

use axum::{
    Json, Router,
    http::{self, HeaderValue},
    routing::{get, patch, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::{
    auth::session::SessionTokens,
    config::{CorsOrigin, DatabaseConfig, PoolSettings},
    db::store::{BookmarkStore, InMemoryStore, PostgresStore, UserStore},
    openapi::ApiDoc,
};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let store = InMemoryStore::new();
/// let state = AppState::builder()
///     .config(config)
///     .tokens(Arc::new(tokens))
///     .users(Arc::new(store.clone()))
///     .bookmarks(Arc::new(store))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub tokens: Arc<SessionTokens>,
    pub users: Arc<dyn UserStore>,
    pub bookmarks: Arc<dyn BookmarkStore>,
}

/// Get the bookmarkd database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connection pool tuned from [`PoolSettings`]. Zero timeouts mean "never".
async fn connect_pool(url: &str, pool: &PoolSettings) -> anyhow::Result<PgPool> {
    let non_zero = |secs: u64| (secs > 0).then(|| Duration::from_secs(secs));

    let pool = PgPoolOptions::new()
        .max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .acquire_timeout(Duration::from_secs(pool.acquire_timeout_secs))
        .idle_timeout(non_zero(pool.idle_timeout_secs))
        .max_lifetime(non_zero(pool.max_lifetime_secs))
        .connect(url)
        .await?;

    Ok(pool)
}

type Stores = (Arc<dyn UserStore>, Arc<dyn BookmarkStore>, Option<PgPool>);

async fn setup_stores(config: &Config) -> anyhow::Result<Stores> {
    match &config.database {
        DatabaseConfig::External { url, pool } => {
            info!("Using external database");
            let pool = connect_pool(url, pool).await?;
            migrator().run(&pool).await?;

            let store = PostgresStore::new(pool.clone());
            Ok((Arc::new(store.clone()), Arc::new(store), Some(pool)))
        }
        DatabaseConfig::Memory => {
            warn!("Using in-memory storage: all accounts and bookmarks are lost on shutdown");
            let store = InMemoryStore::new();
            Ok((Arc::new(store.clone()), Arc::new(store), None))
        }
    }
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Origins never carry a path; Url always renders one
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::PATCH,
            http::Method::DELETE,
        ])
        .allow_headers(vec![http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// - Authentication, user and bookmark routes
/// - `/healthz`, `/openapi.json` and the `/docs` viewer
/// - `/internal/metrics` when metrics are enabled
/// - CORS, plus request tracing when request logging is enabled
///
/// # Errors
///
/// Returns an error if the CORS configuration is invalid.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let router = Router::new()
        .route("/auth/signup", post(api::handlers::auth::signup))
        .route("/auth/signin", post(api::handlers::auth::signin))
        .route("/users/me", get(api::handlers::users::get_me))
        .route("/users", patch(api::handlers::users::update_me))
        .route(
            "/bookmarks",
            get(api::handlers::bookmarks::list_bookmarks).post(api::handlers::bookmarks::create_bookmark),
        )
        .route(
            "/bookmarks/{id}",
            get(api::handlers::bookmarks::get_bookmark)
                .patch(api::handlers::bookmarks::update_bookmark)
                .delete(api::handlers::bookmarks::delete_bookmark),
        )
        .route("/healthz", get(|| async { "OK" }))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state.clone())
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let mut router = router.layer(create_cors_layer(&state.config)?);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    if state.config.enable_request_logging {
        router = router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );
    }

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting bookmarkd with configuration: {:#?}", config);

        let tokens = SessionTokens::from_config(&config)?;
        let (users, bookmarks, pool) = setup_stores(&config).await?;

        let app_state = AppState::builder()
            .config(config.clone())
            .tokens(Arc::new(tokens))
            .users(users)
            .bookmarks(bookmarks)
            .build();

        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "bookmarkd listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;
    use axum::http::StatusCode;

    #[test_log::test(tokio::test)]
    async fn test_application_with_memory_storage() {
        let app = Application::new(create_test_config()).await.unwrap();
        assert!(app.pool.is_none());

        let server = app.into_test_server();
        let response = server.get("/healthz").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[test_log::test(tokio::test)]
    async fn test_application_requires_secret_key() {
        let config = Config {
            secret_key: None,
            ..create_test_config()
        };
        assert!(Application::new(config).await.is_err());
    }

    #[test_log::test(tokio::test)]
    async fn test_docs_are_served() {
        let server = Application::new(create_test_config()).await.unwrap().into_test_server();

        let response = server.get("/openapi.json").await;
        response.assert_status_ok();
        let doc: serde_json::Value = response.json();
        assert!(doc["paths"]["/bookmarks/{id}"].is_object());

        server.get("/docs").await.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_metrics_endpoint_when_enabled() {
        let config = Config {
            enable_metrics: true,
            ..create_test_config()
        };
        let server = Application::new(config).await.unwrap().into_test_server();

        server.get("/healthz").await.assert_status_ok();
        server.get("/internal/metrics").await.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_metrics_endpoint_absent_by_default() {
        let server = Application::new(create_test_config()).await.unwrap().into_test_server();
        server.get("/internal/metrics").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_layer_accepts_configured_origins() {
        let mut config = create_test_config();
        config.auth.security.cors.allowed_origins = vec![
            CorsOrigin::Url("https://app.example.com".parse().unwrap()),
            CorsOrigin::Url("http://localhost:5173".parse().unwrap()),
        ];
        assert!(create_cors_layer(&config).is_ok());

        config.auth.security.cors.allowed_origins = vec![CorsOrigin::Wildcard];
        assert!(create_cors_layer(&config).is_ok());
    }
}
