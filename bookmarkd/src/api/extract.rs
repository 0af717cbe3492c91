use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::errors::Error;

/// JSON request body.
///
/// Same as [`axum::Json`], except that every rejection (missing or wrong content type,
/// unparseable body, wrong field types) becomes a 400 [`Error::BadRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Rejected request body: {}", rejection.body_text());
                Err(Error::BadRequest {
                    message: rejection.body_text(),
                })
            }
        }
    }
}
