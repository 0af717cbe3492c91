//! HTTP API: route handlers and their request/response models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures and their validation rules
//! - **[`extract`]**: Extractors that turn framework rejections into [`crate::errors::Error`]
//!
//! # API Structure
//!
//! - **Authentication** (`/auth/*`): signup and signin, both returning an access token
//! - **Users** (`/users/*`): the caller's own profile
//! - **Bookmarks** (`/bookmarks/*`): CRUD on the caller's bookmarks
//!
//! Everything except `/auth/*`, `/healthz` and the docs requires `Authorization: Bearer <token>`.
//! The OpenAPI document is served at `/openapi.json` and rendered at `/docs`.

pub mod extract;
pub mod handlers;
pub mod models;
