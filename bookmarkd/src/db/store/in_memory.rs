//! In-memory store.
//!
//! Users and bookmarks live in concurrent maps and ids come from atomic counters starting at 1.
//! Constraint behaviour follows the Postgres schema (unique email, bookmark owner must exist) so
//! tests against this store exercise the same error paths as production. Data is lost on
//! restart.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};

use super::{BookmarkStore, UserStore};
use crate::{
    db::{
        errors::{DbError, Result},
        models::{
            bookmarks::{BookmarkCreateDBRequest, BookmarkDBResponse, BookmarkUpdateDBRequest},
            users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
        },
    },
    types::{BookmarkId, UserId},
};

#[derive(Default)]
struct Tables {
    users: DashMap<UserId, UserDBResponse>,
    emails: DashMap<String, UserId>,
    bookmarks: DashMap<BookmarkId, BookmarkDBResponse>,
    user_seq: AtomicI64,
    bookmark_seq: AtomicI64,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        // The email entry stays locked until the user row exists
        match self.tables.emails.entry(request.email.clone()) {
            Entry::Occupied(_) => Err(DbError::UniqueViolation {
                constraint: Some("users_email_key".to_string()),
                table: Some("users".to_string()),
                message: format!("Key (email)=({}) already exists.", request.email),
            }),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = UserDBResponse {
                    id: next_id(&self.tables.user_seq),
                    email: request.email.clone(),
                    password_hash: request.password_hash.clone(),
                    first_name: request.first_name.clone(),
                    last_name: request.last_name.clone(),
                    created_at: now,
                    updated_at: now,
                };
                self.tables.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        Ok(self.tables.users.get(&id).map(|user| user.value().clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDBResponse>> {
        let Some(id) = self.tables.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.tables.users.get(&id).map(|user| user.value().clone()))
    }

    async fn update(&self, id: UserId, request: &UserUpdateDBRequest) -> Result<UserDBResponse> {
        let mut user = self.tables.users.get_mut(&id).ok_or(DbError::NotFound)?;
        if let Some(first_name) = &request.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &request.last_name {
            user.last_name = Some(last_name.clone());
        }
        user.updated_at = Utc::now();
        Ok(user.value().clone())
    }
}

#[async_trait]
impl BookmarkStore for InMemoryStore {
    async fn create(&self, request: &BookmarkCreateDBRequest) -> Result<BookmarkDBResponse> {
        if !self.tables.users.contains_key(&request.user_id) {
            return Err(DbError::ForeignKeyViolation {
                constraint: Some("bookmarks_user_id_fkey".to_string()),
                table: Some("bookmarks".to_string()),
                message: format!("Key (user_id)=({}) is not present in table \"users\".", request.user_id),
            });
        }

        let now = Utc::now();
        let bookmark = BookmarkDBResponse {
            id: next_id(&self.tables.bookmark_seq),
            user_id: request.user_id,
            title: request.title.clone(),
            description: request.description.clone(),
            link: request.link.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.bookmarks.insert(bookmark.id, bookmark.clone());
        Ok(bookmark)
    }

    async fn get_by_id(&self, id: BookmarkId) -> Result<Option<BookmarkDBResponse>> {
        Ok(self.tables.bookmarks.get(&id).map(|bookmark| bookmark.value().clone()))
    }

    async fn get_by_id_and_owner(&self, id: BookmarkId, owner: UserId) -> Result<Option<BookmarkDBResponse>> {
        Ok(self
            .tables
            .bookmarks
            .get(&id)
            .filter(|bookmark| bookmark.user_id == owner)
            .map(|bookmark| bookmark.value().clone()))
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<BookmarkDBResponse>> {
        let mut bookmarks: Vec<_> = self
            .tables
            .bookmarks
            .iter()
            .filter(|entry| entry.user_id == owner)
            .map(|entry| entry.value().clone())
            .collect();
        bookmarks.sort_by_key(|bookmark| bookmark.id);
        Ok(bookmarks)
    }

    async fn update(&self, id: BookmarkId, request: &BookmarkUpdateDBRequest) -> Result<Option<BookmarkDBResponse>> {
        let Some(mut bookmark) = self.tables.bookmarks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &request.title {
            bookmark.title = title.clone();
        }
        if let Some(description) = &request.description {
            bookmark.description = Some(description.clone());
        }
        if let Some(link) = &request.link {
            bookmark.link = link.clone();
        }
        bookmark.updated_at = Utc::now();
        Ok(Some(bookmark.value().clone()))
    }

    async fn delete(&self, id: BookmarkId) -> Result<bool> {
        Ok(self.tables.bookmarks.remove(&id).is_some())
    }
}
