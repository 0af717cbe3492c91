//! API request/response models for bookmarks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::Validator;
use crate::{
    db::models::bookmarks::{BookmarkCreateDBRequest, BookmarkDBResponse, BookmarkUpdateDBRequest},
    errors::Error,
    types::{BookmarkId, UserId},
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookmarkCreate {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    #[schema(format = "uri", example = "https://example.com")]
    pub link: String,
}

impl BookmarkCreate {
    pub fn validate(&self) -> Result<(), Error> {
        let mut v = Validator::new();
        v.not_empty("title", &self.title);
        v.url("link", &self.link);
        v.finish()
    }

    /// The owner always comes from the authenticated caller, never from the body.
    pub fn into_db_request(self, owner: UserId) -> BookmarkCreateDBRequest {
        BookmarkCreateDBRequest {
            user_id: owner,
            title: self.title,
            description: self.description,
            link: self.link,
        }
    }
}

/// Partial update. Absent fields are left unchanged; there is no way to change the owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BookmarkUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(format = "uri")]
    pub link: Option<String>,
}

impl BookmarkUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        let mut v = Validator::new();
        if let Some(title) = &self.title {
            v.not_empty("title", title);
        }
        if let Some(link) = &self.link {
            v.url("link", link);
        }
        v.finish()
    }
}

impl From<BookmarkUpdate> for BookmarkUpdateDBRequest {
    fn from(update: BookmarkUpdate) -> Self {
        Self {
            title: update.title,
            description: update.description,
            link: update.link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookmarkResponse {
    pub id: BookmarkId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookmarkDBResponse> for BookmarkResponse {
    fn from(db: BookmarkDBResponse) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            description: db.description,
            link: db.link,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
