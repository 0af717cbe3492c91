//! Records exchanged with the stores.
//!
//! These mirror the `users` and `bookmarks` tables and derive `sqlx::FromRow`. They are kept
//! separate from the API models in [`crate::api::models`] so that, for example, the password
//! hash never reaches a response body.

pub mod bookmarks;
pub mod users;
