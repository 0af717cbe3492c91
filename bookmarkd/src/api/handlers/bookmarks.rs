//! Bookmark CRUD.
//!
//! Reads by id go through the owner-scoped lookup, so another user's bookmark is a 404.
//! Updates and deletes load by id and then check ownership, so the same situation is a 403.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::{
            bookmarks::{BookmarkCreate, BookmarkResponse, BookmarkUpdate},
            users::CurrentUser,
        },
    },
    auth::ownership,
    errors::{Error, Result},
    types::{BookmarkId, Operation, Resource},
};

/// List the caller's bookmarks
#[utoipa::path(
    get,
    path = "/bookmarks",
    tag = "bookmarks",
    responses(
        (status = 200, description = "The caller's bookmarks, oldest first", body = [BookmarkResponse]),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn list_bookmarks(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<BookmarkResponse>>> {
    let bookmarks = state.bookmarks.list_by_owner(current_user.id).await?;

    Ok(Json(bookmarks.into_iter().map(BookmarkResponse::from).collect()))
}

/// Create a bookmark owned by the caller
#[utoipa::path(
    post,
    path = "/bookmarks",
    request_body = BookmarkCreate,
    tag = "bookmarks",
    responses(
        (status = 201, description = "Bookmark created", body = BookmarkResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ValidationErrorBody),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn create_bookmark(
    State(state): State<AppState>,
    current_user: CurrentUser,
    JsonBody(request): JsonBody<BookmarkCreate>,
) -> Result<(StatusCode, Json<BookmarkResponse>)> {
    request.validate()?;

    let bookmark = state.bookmarks.create(&request.into_db_request(current_user.id)).await?;
    info!(bookmark_id = bookmark.id, "Bookmark created");

    Ok((StatusCode::CREATED, Json(BookmarkResponse::from(bookmark))))
}

/// Get one of the caller's bookmarks
#[utoipa::path(
    get,
    path = "/bookmarks/{id}",
    tag = "bookmarks",
    params(("id" = i64, Path, description = "Bookmark ID")),
    responses(
        (status = 200, description = "Bookmark", body = BookmarkResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such bookmark for this user"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, bookmark_id = id))]
pub async fn get_bookmark(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<BookmarkId>,
) -> Result<Json<BookmarkResponse>> {
    let bookmark = state.bookmarks.get_by_id_and_owner(id, current_user.id).await?;
    let bookmark = ownership::found(bookmark, id)?;

    Ok(Json(BookmarkResponse::from(bookmark)))
}

/// Update one of the caller's bookmarks
///
/// Ownership is checked before the fields are validated, so a caller learns nothing about
/// someone else's bookmark from validation errors. A body that is not JSON at all is rejected
/// with 400 before either check runs.
#[utoipa::path(
    patch,
    path = "/bookmarks/{id}",
    request_body = BookmarkUpdate,
    tag = "bookmarks",
    params(("id" = i64, Path, description = "Bookmark ID")),
    responses(
        (status = 200, description = "Bookmark updated", body = BookmarkResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ValidationErrorBody),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Bookmark missing or owned by someone else"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, bookmark_id = id))]
pub async fn update_bookmark(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<BookmarkId>,
    JsonBody(request): JsonBody<BookmarkUpdate>,
) -> Result<Json<BookmarkResponse>> {
    let existing = state.bookmarks.get_by_id(id).await?;
    ownership::authorize(current_user.id, existing, Operation::Update, id)?;

    request.validate()?;

    // Deleted between the ownership check and the write
    let bookmark = state.bookmarks.update(id, &request.into()).await?.ok_or_else(|| Error::Forbidden {
        action: Operation::Update,
        resource: Resource::Bookmarks,
        id: id.to_string(),
    })?;
    info!("Bookmark updated");

    Ok(Json(BookmarkResponse::from(bookmark)))
}

/// Delete one of the caller's bookmarks
#[utoipa::path(
    delete,
    path = "/bookmarks/{id}",
    tag = "bookmarks",
    params(("id" = i64, Path, description = "Bookmark ID")),
    responses(
        (status = 204, description = "Bookmark deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Bookmark missing or owned by someone else"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id, bookmark_id = id))]
pub async fn delete_bookmark(State(state): State<AppState>, current_user: CurrentUser, Path(id): Path<BookmarkId>) -> Result<StatusCode> {
    let existing = state.bookmarks.get_by_id(id).await?;
    ownership::authorize(current_user.id, existing, Operation::Delete, id)?;

    if !state.bookmarks.delete(id).await? {
        return Err(Error::Forbidden {
            action: Operation::Delete,
            resource: Resource::Bookmarks,
            id: id.to_string(),
        });
    }
    info!("Bookmark deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::bookmarks::BookmarkResponse,
        test_utils::{create_test_app, signup_user},
    };
    use axum::{body::Bytes, http::StatusCode};
    use axum_test::TestServer;
    use serde_json::json;

    async fn create_bookmark(app: &TestServer, token: &str, title: &str, link: &str) -> BookmarkResponse {
        let response = app
            .post("/bookmarks")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"title": title, "link": link}))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[test_log::test(tokio::test)]
    async fn test_bookmark_lifecycle() {
        let app = create_test_app();
        let token = signup_user(&app, "alice@example.com", "hunter22").await;
        let auth = format!("Bearer {token}");

        let created = create_bookmark(&app, &token, "Rust", "https://www.rust-lang.org").await;
        assert_eq!(created.id, 1);
        assert_eq!(created.user_id, 1);
        assert!(created.description.is_none());

        let fetched: BookmarkResponse = app.get("/bookmarks/1").add_header("authorization", &auth).await.json();
        assert_eq!(fetched, created);

        let response = app
            .patch("/bookmarks/1")
            .add_header("authorization", &auth)
            .json(&json!({"description": "The language"}))
            .await;
        response.assert_status_ok();
        let updated: BookmarkResponse = response.json();
        assert_eq!(updated.title, "Rust");
        assert_eq!(updated.description.as_deref(), Some("The language"));

        let listed: Vec<BookmarkResponse> = app.get("/bookmarks").add_header("authorization", &auth).await.json();
        assert_eq!(listed, vec![updated]);

        app.delete("/bookmarks/1")
            .add_header("authorization", &auth)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.get("/bookmarks/1")
            .add_header("authorization", &auth)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[test_log::test(tokio::test)]
    async fn test_list_is_ordered_and_scoped() {
        let app = create_test_app();
        let alice = signup_user(&app, "alice@example.com", "hunter22").await;
        let bob = signup_user(&app, "bob@example.com", "hunter22").await;

        create_bookmark(&app, &alice, "one", "https://one.example").await;
        create_bookmark(&app, &bob, "bob's", "https://bob.example").await;
        create_bookmark(&app, &alice, "two", "https://two.example").await;

        let listed: Vec<BookmarkResponse> = app
            .get("/bookmarks")
            .add_header("authorization", format!("Bearer {alice}"))
            .await
            .json();
        let titles: Vec<&str> = listed.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["one", "two"]);
    }

    #[test_log::test(tokio::test)]
    async fn test_other_users_bookmark() {
        let app = create_test_app();
        let alice = signup_user(&app, "alice@example.com", "hunter22").await;
        let bob = signup_user(&app, "bob@example.com", "hunter22").await;
        let as_bob = format!("Bearer {bob}");

        let created = create_bookmark(&app, &alice, "Alice's", "https://alice.example").await;
        assert_eq!(created.id, 1);

        // Reads are scoped: Bob cannot tell it exists
        app.get("/bookmarks/1")
            .add_header("authorization", &as_bob)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // Mutations are checked: Bob is refused
        let response = app
            .patch("/bookmarks/1")
            .add_header("authorization", &as_bob)
            .json(&json!({"title": "Bob's now"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(response.text(), "Not permitted to update this bookmark");

        app.delete("/bookmarks/1")
            .add_header("authorization", &as_bob)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let bobs: Vec<BookmarkResponse> = app.get("/bookmarks").add_header("authorization", &as_bob).await.json();
        assert!(bobs.is_empty());

        // Alice's bookmark is untouched, and she can still delete it
        let as_alice = format!("Bearer {alice}");
        let fetched: BookmarkResponse = app.get("/bookmarks/1").add_header("authorization", &as_alice).await.json();
        assert_eq!(fetched.title, "Alice's");

        app.delete("/bookmarks/1")
            .add_header("authorization", &as_alice)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        let remaining: Vec<BookmarkResponse> = app.get("/bookmarks").add_header("authorization", &as_alice).await.json();
        assert!(remaining.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_update_checks_ownership_before_fields() {
        let app = create_test_app();
        let alice = signup_user(&app, "alice@example.com", "hunter22").await;
        let bob = signup_user(&app, "bob@example.com", "hunter22").await;
        create_bookmark(&app, &alice, "Alice's", "https://alice.example").await;
        let as_bob = format!("Bearer {bob}");

        // Invalid fields on someone else's bookmark: refused, not validated
        app.patch("/bookmarks/1")
            .add_header("authorization", &as_bob)
            .json(&json!({"title": "", "link": "not a link"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.patch("/bookmarks/42")
            .add_header("authorization", &as_bob)
            .json(&json!({"link": "not a link"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        // Unparseable bodies never reach the ownership check
        app.patch("/bookmarks/1")
            .add_header("authorization", &as_bob)
            .bytes(Bytes::from_static(b"{not json"))
            .content_type("application/json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // The owner gets the validation error
        app.patch("/bookmarks/1")
            .add_header("authorization", format!("Bearer {alice}"))
            .json(&json!({"link": "not a link"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[test_log::test(tokio::test)]
    async fn test_mutating_missing_bookmark_is_forbidden() {
        let app = create_test_app();
        let token = signup_user(&app, "alice@example.com", "hunter22").await;
        let auth = format!("Bearer {token}");

        app.patch("/bookmarks/42")
            .add_header("authorization", &auth)
            .json(&json!({"title": "x"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.delete("/bookmarks/42")
            .add_header("authorization", &auth)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.get("/bookmarks/42")
            .add_header("authorization", &auth)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[test_log::test(tokio::test)]
    async fn test_create_validation() {
        let app = create_test_app();
        let token = signup_user(&app, "alice@example.com", "hunter22").await;
        let auth = format!("Bearer {token}");

        for body in [
            json!({"link": "https://x.example"}),
            json!({"title": "", "link": "https://x.example"}),
            json!({"title": "no link"}),
            json!({"title": "bad link", "link": "not a url"}),
            json!({"title": "bad scheme", "link": "javascript:alert(1)"}),
        ] {
            app.post("/bookmarks")
                .add_header("authorization", &auth)
                .json(&body)
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }

        let listed: Vec<BookmarkResponse> = app.get("/bookmarks").add_header("authorization", &auth).await.json();
        assert!(listed.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_owner_cannot_be_set_from_body() {
        let app = create_test_app();
        let alice = signup_user(&app, "alice@example.com", "hunter22").await;
        let bob = signup_user(&app, "bob@example.com", "hunter22").await;

        let response = app
            .post("/bookmarks")
            .add_header("authorization", format!("Bearer {bob}"))
            .json(&json!({"title": "sneaky", "link": "https://x.example", "user_id": 1}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: BookmarkResponse = response.json();
        assert_eq!(created.user_id, 2);

        let alices: Vec<BookmarkResponse> = app
            .get("/bookmarks")
            .add_header("authorization", format!("Bearer {alice}"))
            .await
            .json();
        assert!(alices.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_bookmarks_require_authentication() {
        let app = create_test_app();

        app.get("/bookmarks").await.assert_status(StatusCode::UNAUTHORIZED);
        app.post("/bookmarks")
            .json(&json!({"title": "t", "link": "https://x.example"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        app.get("/bookmarks/1").await.assert_status(StatusCode::UNAUTHORIZED);
        app.delete("/bookmarks/1").await.assert_status(StatusCode::UNAUTHORIZED);
    }
}
