//! Shared fixtures for handler and extractor tests.
//!
//! Everything runs against [`InMemoryStore`], so no database is needed. Argon2 costs are turned
//! down to keep signup fast.

use std::{sync::Arc, time::Duration};

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use crate::{
    AppState, build_router,
    api::models::auth::AuthResponse,
    auth::session::SessionTokens,
    config::{AuthConfig, Config, DatabaseConfig, PasswordConfig, SecurityConfig},
    db::store::InMemoryStore,
};

pub fn create_test_config() -> Config {
    Config {
        secret_key: Some("test-secret-key".to_string()),
        database: DatabaseConfig::Memory,
        auth: AuthConfig {
            password: PasswordConfig {
                argon2_memory_kib: 128,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                ..Default::default()
            },
            security: SecurityConfig {
                jwt_expiry: Duration::from_secs(15 * 60),
                ..Default::default()
            },
        },
        enable_request_logging: false,
        ..Default::default()
    }
}

pub fn create_test_state_with_config(config: Config) -> AppState {
    let tokens = SessionTokens::from_config(&config).expect("Test config should carry a secret key");
    let store = InMemoryStore::new();

    AppState::builder()
        .config(config)
        .tokens(Arc::new(tokens))
        .users(Arc::new(store.clone()))
        .bookmarks(Arc::new(store))
        .build()
}

pub fn create_test_state() -> AppState {
    create_test_state_with_config(create_test_config())
}

/// Test server over an existing state, for tests that also inspect the stores directly.
pub fn create_test_app_with_state(state: AppState) -> TestServer {
    let router = build_router(&state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

pub fn create_test_app() -> TestServer {
    create_test_app_with_state(create_test_state())
}

/// Sign up through the API and return the access token.
pub async fn signup_user(app: &TestServer, email: &str, password: &str) -> String {
    let response = app
        .post("/auth/signup")
        .json(&json!({"email": email, "password": password}))
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<AuthResponse>().access_token
}
