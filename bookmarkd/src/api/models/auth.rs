//! API request/response models for signup and signin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::Validator;
use crate::{auth::session::IssuedToken, config::PasswordConfig, errors::Error};

/// Signup body. Missing fields deserialize as empty and are reported by [`SignupRequest::validate`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self, password_rules: &PasswordConfig) -> Result<(), Error> {
        let mut v = Validator::new();
        v.email("email", &self.email);
        if v.not_empty("password", &self.password) {
            v.length("password", &self.password, password_rules.min_length, password_rules.max_length);
        }
        v.finish()
    }
}

/// Signin body. Only presence and shape are checked; password rules apply at signup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SigninRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SigninRequest {
    pub fn validate(&self) -> Result<(), Error> {
        let mut v = Validator::new();
        v.email("email", &self.email);
        v.not_empty("password", &self.password);
        v.finish()
    }
}

/// Returned by signup and signin.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for AuthResponse {
    fn from(token: IssuedToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_at: token.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    fn failing_fields(result: Result<(), Error>) -> Vec<String> {
        match result {
            Ok(()) => vec![],
            Err(Error::Validation { errors }) => errors.into_iter().map(|e| e.field).collect(),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_signup_validation() {
        let rules = PasswordConfig::default();

        assert!(signup("a@x.com", "secret123").validate(&rules).is_ok());
        assert_eq!(failing_fields(signup("", "secret123").validate(&rules)), vec!["email"]);
        assert_eq!(failing_fields(signup("not-an-email", "secret123").validate(&rules)), vec!["email"]);
        assert_eq!(failing_fields(signup("a@x.com", "").validate(&rules)), vec!["password"]);
        assert_eq!(failing_fields(signup("", "").validate(&rules)), vec!["email", "password"]);
    }

    #[test]
    fn test_signup_password_bounds() {
        let rules = PasswordConfig {
            min_length: 8,
            max_length: 12,
            ..Default::default()
        };

        assert_eq!(failing_fields(signup("a@x.com", "short").validate(&rules)), vec!["password"]);
        assert_eq!(failing_fields(signup("a@x.com", "much-too-long-password").validate(&rules)), vec!["password"]);
        assert!(signup("a@x.com", "just-right").validate(&rules).is_ok());
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let request: SigninRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(failing_fields(request.validate()), vec!["email", "password"]);
    }
}
