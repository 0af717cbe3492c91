//! Authentication and authorization.
//!
//! # Flow
//!
//! ```text
//! signup/signin ──► password ──► UserStore ──► session::SessionTokens::issue ──► access token
//!
//! protected request ──► current_user (Bearer token)
//!                         ├─ SessionTokens::validate (signature, expiry)
//!                         └─ UserStore::get_by_id    (subject still exists)
//!                       ──► handler ──► ownership ──► BookmarkStore
//! ```
//!
//! Per request the state only moves forward: unauthenticated, then authenticated once the gate
//! passes, then authorized or denied at the ownership check. Nothing is carried between
//! requests and nothing is retried.
//!
//! # Modules
//!
//! - [`password`]: Argon2id hashing and verification
//! - [`session`]: Signed, time-bound access tokens
//! - [`current_user`]: The request gate, an extractor yielding
//!   [`CurrentUser`](crate::api::models::users::CurrentUser)
//! - [`ownership`]: Owner checks for read-by-id and for mutations
//!
//! # Usage in Handlers
//!
//! ```ignore
//! async fn protected_handler(State(state): State<AppState>, current_user: CurrentUser) -> Result<String> {
//!     Ok(format!("Hello, {}!", current_user.email))
//! }
//! ```

pub mod current_user;
pub mod ownership;
pub mod password;
pub mod session;
