use axum::{Json, extract::State, http::StatusCode};
use tracing::{debug, info};

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::auth::{AuthResponse, SigninRequest, SignupRequest},
    },
    auth::password::{self, Argon2Params},
    db::models::users::UserCreateDBRequest,
    errors::{Error, Result},
};

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some("Invalid email or password".to_string()),
    }
}

/// Create an account and sign it in
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    tag = "authentication",
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ValidationErrorBody),
        (status = 403, description = "Credentials taken"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn signup(State(state): State<AppState>, JsonBody(request): JsonBody<SignupRequest>) -> Result<(StatusCode, Json<AuthResponse>)> {
    request.validate(&state.config.auth.password)?;

    if state.users.get_user_by_email(&request.email).await?.is_some() {
        return Err(Error::DuplicateCredential);
    }

    // Hash the password on a blocking thread to avoid blocking async runtime
    let params = Argon2Params::from(&state.config.auth.password);
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password, params))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    // A concurrent signup can still win the race after the lookup above
    let user = state
        .users
        .create(&UserCreateDBRequest {
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await
        .map_err(|e| if e.is_duplicate_email() { Error::DuplicateCredential } else { e.into() })?;

    let token = state.tokens.issue(user.id, &user.email)?;
    info!(user_id = user.id, "Account created");

    Ok((StatusCode::CREATED, Json(token.into())))
}

/// Exchange email and password for an access token
#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = SigninRequest,
    tag = "authentication",
    responses(
        (status = 201, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::errors::ValidationErrorBody),
        (status = 401, description = "Invalid email or password"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn signin(State(state): State<AppState>, JsonBody(request): JsonBody<SigninRequest>) -> Result<(StatusCode, Json<AuthResponse>)> {
    request.validate()?;

    let user = state.users.get_user_by_email(&request.email).await?;

    // Unknown emails still pay for a hash so response times do not reveal which accounts exist
    let password = request.password;
    let password_hash = user.as_ref().map(|user| user.password_hash.clone());
    let params = Argon2Params::from(&state.config.auth.password);
    let is_valid = tokio::task::spawn_blocking(move || match password_hash {
        Some(hash) => password::verify_password(&password, &hash),
        None => password::verify_without_account(&password, params),
    })
    .await
    .map_err(|e| Error::Internal {
        operation: format!("spawn password verification task: {e}"),
    })?;

    let Some(user) = user else {
        debug!("Signin for unknown email");
        return Err(invalid_credentials());
    };

    if !is_valid {
        debug!(user_id = user.id, "Signin with wrong password");
        return Err(invalid_credentials());
    }

    let token = state.tokens.issue(user.id, &user.email)?;
    info!(user_id = user.id, "Signed in");

    Ok((StatusCode::CREATED, Json(token.into())))
}
