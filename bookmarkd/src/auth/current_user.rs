//! The request gate.
//!
//! Any handler that takes a [`CurrentUser`] argument only runs once the caller presented a
//! valid `Authorization: Bearer <token>` header for an account that still exists. Every way of
//! failing that produces the same 401.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, instrument, trace};

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session::{SessionTokens, TokenError},
    db::store::UserStore,
    errors::{Error, Result},
};

/// Raw token from `Authorization: Bearer <token>`, if the header has that shape.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Validate a token and resolve its subject to a live account.
///
/// Token failures become [`Error::Unauthenticated`]. A failing store lookup is returned as is,
/// so an unreachable database shows up as a server error rather than a 401.
#[instrument(skip_all)]
pub async fn authenticate(tokens: &SessionTokens, users: &dyn UserStore, token: &str) -> Result<CurrentUser> {
    let claims = tokens.validate(token).map_err(|e| {
        debug!("Token rejected: {e}");
        Error::from(e)
    })?;
    trace!(user_id = claims.sub, "Token signature and expiry valid");

    match users.get_by_id(claims.sub).await? {
        Some(user) => Ok(CurrentUser::from(&user)),
        None => {
            let e = TokenError::UnknownSubject(claims.sub);
            debug!("Token rejected: {e}");
            Err(e.into())
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = bearer_token(parts) else {
            trace!("No bearer token on request");
            return Err(Error::Unauthenticated { message: None });
        };

        let user = authenticate(&state.tokens, state.users.as_ref(), token).await?;
        debug!(user_id = user.id, "Authenticated request");
        Ok(user)
    }
}
