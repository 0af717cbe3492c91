//! End-to-end journeys through the full router.

use axum::http::StatusCode;
use chrono::{TimeDelta, Utc};
use serde_json::json;

use crate::{
    api::models::{auth::AuthResponse, bookmarks::BookmarkResponse, users::UserResponse},
    test_utils::{create_test_app, create_test_app_with_state, create_test_state, signup_user},
};

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Two users, one bookmark: scoped reads hide it, mutations are refused, the owner deletes it.
#[test_log::test(tokio::test)]
async fn test_two_user_ownership_scenario() {
    let app = create_test_app();

    let response = app
        .post("/auth/signup")
        .json(&json!({"email": "a@x.com", "password": "secret123"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let t1 = response.json::<AuthResponse>().access_token;

    let response = app
        .post("/bookmarks")
        .add_header("authorization", bearer(&t1))
        .json(&json!({"title": "t", "link": "https://x.com"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let bookmark: BookmarkResponse = response.json();
    assert_eq!(bookmark.id, 1);
    assert_eq!(bookmark.user_id, 1);

    signup_user(&app, "b@x.com", "secret456").await;
    let response = app
        .post("/auth/signin")
        .json(&json!({"email": "b@x.com", "password": "secret456"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let t2 = response.json::<AuthResponse>().access_token;

    app.get("/bookmarks/1")
        .add_header("authorization", bearer(&t2))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.patch("/bookmarks/1")
        .add_header("authorization", bearer(&t2))
        .json(&json!({"title": "mine now"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.delete("/bookmarks/1")
        .add_header("authorization", bearer(&t1))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = app.get("/bookmarks").add_header("authorization", bearer(&t1)).await;
    response.assert_status_ok();
    assert!(response.json::<Vec<BookmarkResponse>>().is_empty());
}

/// The journey a browser client takes: sign up, fill in the profile, manage a few bookmarks.
#[test_log::test(tokio::test)]
async fn test_user_journey() {
    let app = create_test_app();
    let token = signup_user(&app, "vlad@example.com", "correct horse").await;
    let auth = bearer(&token);

    let me: UserResponse = app.get("/users/me").add_header("authorization", &auth).await.json();
    assert_eq!(me.email, "vlad@example.com");

    let updated: UserResponse = app
        .patch("/users")
        .add_header("authorization", &auth)
        .json(&json!({"first_name": "Vlad", "last_name": "Tepes"}))
        .await
        .json();
    assert_eq!(updated.first_name.as_deref(), Some("Vlad"));
    assert_eq!(updated.id, me.id);
    assert!(updated.updated_at >= me.updated_at);

    for (title, link) in [("Docs", "https://docs.rs"), ("Crates", "https://crates.io")] {
        app.post("/bookmarks")
            .add_header("authorization", &auth)
            .json(&json!({"title": title, "link": link, "description": "reference"}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let patched: BookmarkResponse = app
        .patch("/bookmarks/2")
        .add_header("authorization", &auth)
        .json(&json!({"link": "https://lib.rs"}))
        .await
        .json();
    assert_eq!(patched.title, "Crates");
    assert_eq!(patched.link, "https://lib.rs");
    assert_eq!(patched.description.as_deref(), Some("reference"));

    app.patch("/bookmarks/2")
        .add_header("authorization", &auth)
        .json(&json!({"link": "not a link"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let listed: Vec<BookmarkResponse> = app.get("/bookmarks").add_header("authorization", &auth).await.json();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1], patched);

    // A fresh signin token works alongside the signup one
    let response = app
        .post("/auth/signin")
        .json(&json!({"email": "vlad@example.com", "password": "correct horse"}))
        .await;
    let second = response.json::<AuthResponse>().access_token;
    app.get("/bookmarks/1")
        .add_header("authorization", bearer(&second))
        .await
        .assert_status_ok();
}

#[test_log::test(tokio::test)]
async fn test_expired_and_forged_tokens_are_rejected() {
    let state = create_test_state();
    let app = create_test_app_with_state(state.clone());
    signup_user(&app, "a@x.com", "secret123").await;

    let stale = state
        .tokens
        .issue_at(1, "a@x.com", Utc::now() - TimeDelta::hours(1))
        .unwrap()
        .access_token;
    let forged = crate::auth::session::SessionTokens::new(b"not-our-secret", state.tokens.expiry())
        .issue(1, "a@x.com")
        .unwrap()
        .access_token;
    let orphan = state.tokens.issue(42, "ghost@x.com").unwrap().access_token;

    let mut bodies = Vec::new();
    for token in [stale, forged, orphan] {
        let response = app.get("/users/me").add_header("authorization", bearer(&token)).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        bodies.push(response.text());
    }

    // One response for every cause
    let missing = app.get("/users/me").await;
    missing.assert_status(StatusCode::UNAUTHORIZED);
    bodies.push(missing.text());
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}
