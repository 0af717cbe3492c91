//! Storage contracts used by the auth core and the API handlers.
//!
//! [`UserStore`] is the credential store: the token gate resolves subjects through
//! [`UserStore::get_by_id`] and signin looks accounts up with
//! [`UserStore::get_user_by_email`]. [`BookmarkStore`] is the resource store; it offers both an
//! unscoped [`BookmarkStore::get_by_id`] (for load-then-check on mutations) and the owner-scoped
//! [`BookmarkStore::get_by_id_and_owner`] (for reads).
//!
//! Implementations must make each single-row operation atomic. Two are provided:
//!
//! - [`PostgresStore`]: the production backend
//! - [`InMemoryStore`]: process-local maps, used in tests and for `database.type: memory`

use async_trait::async_trait;

use crate::{
    db::{
        errors::Result,
        models::{
            bookmarks::{BookmarkCreateDBRequest, BookmarkDBResponse, BookmarkUpdateDBRequest},
            users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
        },
    },
    types::{BookmarkId, UserId},
};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account.
    ///
    /// # Errors
    /// - [`DbError::UniqueViolation`](crate::db::errors::DbError::UniqueViolation) on the
    ///   `users.email` constraint if the email is taken
    async fn create(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>>;

    /// Exact, case-sensitive match.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDBResponse>>;

    /// # Errors
    /// - [`DbError::NotFound`](crate::db::errors::DbError::NotFound) if no such user exists
    async fn update(&self, id: UserId, request: &UserUpdateDBRequest) -> Result<UserDBResponse>;
}

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// # Errors
    /// - [`DbError::ForeignKeyViolation`](crate::db::errors::DbError::ForeignKeyViolation) if the
    ///   owner does not exist
    async fn create(&self, request: &BookmarkCreateDBRequest) -> Result<BookmarkDBResponse>;

    /// Unscoped lookup by id.
    async fn get_by_id(&self, id: BookmarkId) -> Result<Option<BookmarkDBResponse>>;

    /// Lookup filtered by owner; another owner's bookmark is `None`.
    async fn get_by_id_and_owner(&self, id: BookmarkId, owner: UserId) -> Result<Option<BookmarkDBResponse>>;

    /// All bookmarks of one owner, oldest first.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<BookmarkDBResponse>>;

    /// Returns `None` if the bookmark does not exist.
    async fn update(&self, id: BookmarkId, request: &BookmarkUpdateDBRequest) -> Result<Option<BookmarkDBResponse>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: BookmarkId) -> Result<bool>;
}
