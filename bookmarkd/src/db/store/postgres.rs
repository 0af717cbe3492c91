use async_trait::async_trait;
use sqlx::PgPool;

use super::{BookmarkStore, UserStore};
use crate::{
    db::{
        errors::Result,
        handlers::{Bookmarks, Users},
        models::{
            bookmarks::{BookmarkCreateDBRequest, BookmarkDBResponse, BookmarkUpdateDBRequest},
            users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
        },
    },
    types::{BookmarkId, UserId},
};

/// Store backed by a Postgres pool. Each call checks out one connection and runs a single
/// statement through the matching repository.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn create(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).create(request).await
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_user_by_email(email).await
    }

    async fn update(&self, id: UserId, request: &UserUpdateDBRequest) -> Result<UserDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).update(id, request).await
    }
}

#[async_trait]
impl BookmarkStore for PostgresStore {
    async fn create(&self, request: &BookmarkCreateDBRequest) -> Result<BookmarkDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Bookmarks::new(&mut conn).create(request).await
    }

    async fn get_by_id(&self, id: BookmarkId) -> Result<Option<BookmarkDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Bookmarks::new(&mut conn).get_by_id(id).await
    }

    async fn get_by_id_and_owner(&self, id: BookmarkId, owner: UserId) -> Result<Option<BookmarkDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Bookmarks::new(&mut conn).get_by_id_and_owner(id, owner).await
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<BookmarkDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Bookmarks::new(&mut conn).list_by_owner(owner).await
    }

    async fn update(&self, id: BookmarkId, request: &BookmarkUpdateDBRequest) -> Result<Option<BookmarkDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Bookmarks::new(&mut conn).update(id, request).await
    }

    async fn delete(&self, id: BookmarkId) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        Bookmarks::new(&mut conn).delete(id).await
    }
}
