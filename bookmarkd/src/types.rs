//! Common type definitions shared by the API, auth and storage layers.
//!
//! # ID Types
//!
//! Entity IDs are store-assigned 64-bit integers wrapped in type aliases:
//!
//! - [`UserId`]: User account identifier, immutable for the lifetime of the account
//! - [`BookmarkId`]: Bookmark identifier
//!
//! # Authorization Vocabulary
//!
//! - [`Resource`]: What entity type is being accessed
//! - [`Operation`]: What action is being performed on it
//!
//! Both appear in [`crate::errors::Error::Forbidden`] so that denied requests are logged with
//! enough context to tell which check failed.

use std::fmt;

pub type UserId = i64;
pub type BookmarkId = i64;

// Mutations that can be refused on owned resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Update,
    Delete,
}

// Resources that can be operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Bookmarks,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Users => write!(f, "User"),
            Resource::Bookmarks => write!(f, "Bookmark"),
        }
    }
}
