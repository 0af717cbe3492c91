use axum::{Json, extract::State};
use tracing::info;

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::users::{CurrentUser, UserResponse, UserUpdate},
    },
    errors::{Error, Result},
    types::Resource,
};

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn get_me(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<UserResponse>> {
    let user = state.users.get_by_id(current_user.id).await?.ok_or_else(|| Error::NotFound {
        resource: Resource::Users.to_string(),
        id: current_user.id.to_string(),
    })?;

    Ok(Json(UserResponse::from(user)))
}

/// Update the authenticated user's names
#[utoipa::path(
    patch,
    path = "/users",
    request_body = UserUpdate,
    tag = "users",
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ValidationErrorBody),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn update_me(
    State(state): State<AppState>,
    current_user: CurrentUser,
    JsonBody(request): JsonBody<UserUpdate>,
) -> Result<Json<UserResponse>> {
    request.validate()?;

    let user = state.users.update(current_user.id, &request.into()).await?;
    info!("Profile updated");

    Ok(Json(UserResponse::from(user)))
}
