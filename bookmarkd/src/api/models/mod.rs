//! API request and response data models.
//!
//! API models are distinct from the database records in [`crate::db::models`]; in particular
//! responses never carry a password hash. Request models validate themselves through
//! [`validation`], reporting every offending field at once.

pub mod auth;
pub mod bookmarks;
pub mod users;
pub mod validation;
