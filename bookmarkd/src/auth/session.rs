//! Access token issuance and validation.
//!
//! Tokens are HS256 JWTs carrying [`SessionClaims`]. They are never stored: a token is valid
//! exactly while its signature checks out and the current time is before `exp`. There is no
//! leeway.
//!
//! JWT timestamps are whole seconds. `exp` is `t + d` rounded up to the next second, so a token
//! issued at `t` with expiry `d` is accepted for at least `d` and less than `d + 1s`. When `t` falls
//! on a whole second the window is exactly `d`.
//!
//! [`SessionTokens`] holds the signing key and expiry. It is built once from configuration at
//! startup and handed to whatever needs it through application state.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use thiserror::Error as ThisError;

use crate::{config::Config, errors::Error, types::UserId};

/// JWT session claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserId,   // Subject (user ID)
    pub email: String, // Email at issuance
    pub iat: i64,      // Issued at
    pub exp: i64,      // Expiration time
}

/// A freshly minted token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Why a presented token was rejected.
///
/// Only logged. Every variant reaches the caller as the same
/// [`Error::Unauthenticated`] response.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not a decodable HS256 JWT with our claims
    #[error("token is malformed")]
    Malformed,
    /// Tampered with, or signed with a different key
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    /// Signature and expiry are fine, but the account no longer exists
    #[error("token subject {0} does not resolve to an account")]
    UnknownSubject(UserId),
}

impl From<TokenError> for Error {
    fn from(_: TokenError) -> Self {
        Error::Unauthenticated { message: None }
    }
}

/// Signing key and lifetime for access tokens.
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl SessionTokens {
    pub fn new(secret: &[u8], expiry: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in validate_at against the caller's clock
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            expiry,
        }
    }

    /// Build from `secret_key` and `auth.security.jwt_expiry`.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let secret_key = config.secret_key.as_deref().ok_or_else(|| Error::Internal {
            operation: "create session tokens: secret_key is required".to_string(),
        })?;

        Ok(Self::new(secret_key.as_bytes(), config.auth.security.jwt_expiry))
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Mint a token for a verified identity.
    pub fn issue(&self, user_id: UserId, email: &str) -> Result<IssuedToken, Error> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(&self, user_id: UserId, email: &str, now: DateTime<Utc>) -> Result<IssuedToken, Error> {
        let iat = now.timestamp();
        let deadline = TimeDelta::from_std(self.expiry)
            .ok()
            .and_then(|expiry| now.checked_add_signed(expiry))
            .ok_or_else(|| Error::Internal {
                operation: format!("compute token expiry from {:?}", self.expiry),
            })?;
        // Round up so the token never lives shorter than the configured expiry
        let exp = deadline.timestamp() + i64::from(deadline.timestamp_subsec_nanos() > 0);
        let expires_at = DateTime::from_timestamp(exp, 0).ok_or_else(|| Error::Internal {
            operation: format!("represent token expiry {exp}"),
        })?;

        let claims = SessionClaims {
            sub: user_id,
            email: email.to_string(),
            iat,
            exp,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| Error::Internal {
            operation: format!("create JWT: {e}"),
        })?;

        Ok(IssuedToken { access_token, expires_at })
    }

    /// Check signature and expiry, returning the embedded claims.
    ///
    /// Does not look the subject up; see [`crate::auth::current_user`] for the full gate.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        })?;

        if now.timestamp() >= token_data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}
