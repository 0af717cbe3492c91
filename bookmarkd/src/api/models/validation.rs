//! Field-level request validation.
//!
//! Request models collect problems into a [`Validator`] and turn them into a single
//! [`Error::Validation`] listing every failing field.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::errors::{Error, FieldError};

/// Schemes accepted for bookmark links.
const LINK_SCHEMES: &[&str] = &["http", "https", "ftp"];

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$").expect("email pattern compiles"));

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Fails unless `value` has at least one non-whitespace character. Returns whether it passed.
    pub fn not_empty(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, "must not be empty");
            false
        } else {
            true
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.not_empty(field, value) && !is_valid_email(value) {
            self.add(field, "must be a valid email address");
        }
    }

    pub fn url(&mut self, field: &str, value: &str) {
        if self.not_empty(field, value) && !is_valid_link(value) {
            self.add(field, "must be a valid http, https or ftp URL");
        }
    }

    /// Length bounds counted in characters, not bytes.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min {
            self.add(field, format!("must be at least {min} characters"));
        } else if len > max {
            self.add(field, format!("must be no more than {max} characters"));
        }
    }

    pub fn finish(self) -> Result<(), Error> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { errors: self.errors })
        }
    }
}

/// ASCII `local@domain.tld`, at most [`MAX_EMAIL_LENGTH`] bytes, with no empty domain labels.
pub fn is_valid_email(value: &str) -> bool {
    value.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(value)
}

/// Absolute URL with a host and one of [`LINK_SCHEMES`].
pub fn is_valid_link(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => LINK_SCHEMES.contains(&url.scheme()) && url.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}
