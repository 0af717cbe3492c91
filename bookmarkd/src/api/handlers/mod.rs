//! HTTP request handlers for all API endpoints.
//!
//! Each handler is responsible for:
//! - Request deserialization and validation
//! - Authentication (by taking a [`CurrentUser`](crate::api::models::users::CurrentUser)
//!   argument) and ownership checks via [`crate::auth::ownership`]
//! - Calling the stores held in [`AppState`](crate::AppState)
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`auth`]: Signup and signin
//! - [`users`]: The caller's own profile
//! - [`bookmarks`]: Bookmark CRUD, scoped to the caller

pub mod auth;
pub mod bookmarks;
pub mod users;
