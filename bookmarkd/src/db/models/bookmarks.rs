use crate::types::{BookmarkId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a new bookmark
#[derive(Debug, Clone)]
pub struct BookmarkCreateDBRequest {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
}

/// Database request for updating a bookmark. `None` leaves a field unchanged; the owner is
/// not updatable.
#[derive(Debug, Clone, Default)]
pub struct BookmarkUpdateDBRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// Database response for a bookmark
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BookmarkDBResponse {
    pub id: BookmarkId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
