use crate::{
    db::{
        errors::Result,
        models::bookmarks::{BookmarkCreateDBRequest, BookmarkDBResponse, BookmarkUpdateDBRequest},
    },
    types::{BookmarkId, UserId},
};
use sqlx::PgConnection;
use tracing::instrument;

const BOOKMARK_COLUMNS: &str = "id, user_id, title, description, link, created_at, updated_at";

pub struct Bookmarks<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Bookmarks<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id), err)]
    pub async fn create(&mut self, request: &BookmarkCreateDBRequest) -> Result<BookmarkDBResponse> {
        let bookmark = sqlx::query_as::<_, BookmarkDBResponse>(&format!(
            "INSERT INTO bookmarks (user_id, title, description, link)
             VALUES ($1, $2, $3, $4)
             RETURNING {BOOKMARK_COLUMNS}"
        ))
        .bind(request.user_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.link)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(bookmark)
    }

    /// Load a bookmark by id alone, whoever owns it.
    #[instrument(skip(self), fields(bookmark_id = id), err)]
    pub async fn get_by_id(&mut self, id: BookmarkId) -> Result<Option<BookmarkDBResponse>> {
        let bookmark = sqlx::query_as::<_, BookmarkDBResponse>(&format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(bookmark)
    }

    /// Owner-scoped lookup: a bookmark owned by someone else comes back as `None`.
    #[instrument(skip(self), fields(bookmark_id = id, user_id = owner), err)]
    pub async fn get_by_id_and_owner(&mut self, id: BookmarkId, owner: UserId) -> Result<Option<BookmarkDBResponse>> {
        let bookmark = sqlx::query_as::<_, BookmarkDBResponse>(&format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(bookmark)
    }

    #[instrument(skip(self), fields(user_id = owner), err)]
    pub async fn list_by_owner(&mut self, owner: UserId) -> Result<Vec<BookmarkDBResponse>> {
        let bookmarks = sqlx::query_as::<_, BookmarkDBResponse>(&format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE user_id = $1 ORDER BY id"
        ))
        .bind(owner)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(bookmarks)
    }

    #[instrument(skip(self, request), fields(bookmark_id = id), err)]
    pub async fn update(&mut self, id: BookmarkId, request: &BookmarkUpdateDBRequest) -> Result<Option<BookmarkDBResponse>> {
        let bookmark = sqlx::query_as::<_, BookmarkDBResponse>(&format!(
            "UPDATE bookmarks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                link = COALESCE($4, link),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {BOOKMARK_COLUMNS}"
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.link)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(bookmark)
    }

    #[instrument(skip(self), fields(bookmark_id = id), err)]
    pub async fn delete(&mut self, id: BookmarkId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
