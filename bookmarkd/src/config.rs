//! Configuration management for the bookmark service.
//!
//! Configuration is loaded from multiple sources, in order of increasing priority:
//!
//! 1. **Default values** from [`Config::default`]
//! 2. **YAML config file** (default: `config.yaml`, override with `-f`)
//! 3. **Environment variables** prefixed with `BOOKMARKD_`
//! 4. **`DATABASE_URL`**, which replaces the external database URL
//!
//! Nested fields are addressed with double underscores:
//!
//! ```bash
//! BOOKMARKD_PORT=8080
//! BOOKMARKD_SECRET_KEY="change-me"
//! BOOKMARKD_AUTH__SECURITY__JWT_EXPIRY="30m"
//! BOOKMARKD_AUTH__PASSWORD__MIN_LENGTH=10
//! ```
//!
//! The `secret_key` signs access tokens. It is read once at startup and never changes for the
//! lifetime of the process; [`Config::validate`] refuses to start without it.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use url::Url;

use crate::errors::Error;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "BOOKMARKD_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// `Debug` prints `secret_key` as `<redacted>`, so the whole struct is safe to log.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Interface to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Where users and bookmarks are stored
    pub database: DatabaseConfig,
    /// Secret used to sign access tokens (HS256). Required.
    pub secret_key: Option<String>,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Expose Prometheus metrics at `/internal/metrics`
    pub enable_metrics: bool,
    /// Log every HTTP request and response through the trace layer
    pub enable_request_logging: bool,
}

/// Storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// External PostgreSQL database; migrations run on startup
    External {
        /// Connection string
        url: String,
        /// Connection pool settings
        #[serde(default)]
        pool: PoolSettings,
    },
    /// Process-local storage, lost on restart. Intended for development and tests.
    Memory,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::External {
            url: "postgres://localhost:5432/bookmarkd".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
    /// Time before idle connections are closed (seconds, 0 = never)
    pub idle_timeout_secs: u64,
    /// Maximum lifetime of a connection (seconds, 0 = never)
    pub max_lifetime_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Password rules and hashing cost
    pub password: PasswordConfig,
    /// Token lifetime and CORS
    pub security: SecurityConfig,
}

/// Password validation rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    /// Minimum password length
    pub min_length: usize,
    /// Maximum password length
    pub max_length: usize,
    /// Argon2 memory cost in KiB (default: 19456 KiB = 19 MB)
    pub argon2_memory_kib: u32,
    /// Argon2 iterations (default: 2)
    pub argon2_iterations: u32,
    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: 64,
            argon2_memory_kib: 19456,
            argon2_iterations: 2,
            argon2_parallelism: 1,
        }
    }
}

/// Security configuration for access tokens and CORS.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    /// How long an access token stays valid after issuance
    #[serde(with = "humantime_serde")]
    pub jwt_expiry: Duration,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_expiry: Duration::from_secs(15 * 60),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests
    pub allowed_origins: Vec<CorsOrigin>,
    /// Allow credentials in CORS requests
    pub allow_credentials: bool,
    /// Cache preflight requests for this many seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allow_credentials: false,
            max_age: Some(3600),
        }
    }
}

/// CORS origin specification.
///
/// Either a wildcard (`*`) or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("auth", &self.auth)
            .field("enable_metrics", &self.enable_metrics)
            .field("enable_request_logging", &self.enable_request_logging)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database: DatabaseConfig::default(),
            secret_key: None,
            auth: AuthConfig::default(),
            enable_metrics: false,
            enable_request_logging: true,
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database = match config.database {
                DatabaseConfig::External { pool, .. } => DatabaseConfig::External { url, pool },
                DatabaseConfig::Memory => DatabaseConfig::External {
                    url,
                    pool: PoolSettings::default(),
                },
            };
        }

        Ok(config)
    }

    /// Check settings that deserialize fine but would make the service unusable.
    pub fn validate(&self) -> Result<(), Error> {
        match self.secret_key.as_deref() {
            None => {
                return Err(Error::Internal {
                    operation: "Config validation: secret_key is not configured. \
                     Please set BOOKMARKD_SECRET_KEY environment variable or add secret_key to config file."
                        .to_string(),
                });
            }
            Some(key) if key.trim().is_empty() => {
                return Err(Error::Internal {
                    operation: "Config validation: secret_key must not be empty".to_string(),
                });
            }
            Some(_) => {}
        }

        let password = &self.auth.password;
        if password.min_length == 0 {
            return Err(Error::Internal {
                operation: "Config validation: auth.password.min_length must be at least 1".to_string(),
            });
        }
        if password.min_length > password.max_length {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: auth.password.min_length ({}) cannot be greater than max_length ({})",
                    password.min_length, password.max_length
                ),
            });
        }

        if self.auth.security.jwt_expiry.is_zero() {
            return Err(Error::Internal {
                operation: "Config validation: auth.security.jwt_expiry must be greater than zero".to_string(),
            });
        }

        let cors = &self.auth.security.cors;
        if cors.allow_credentials && cors.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
            return Err(Error::Internal {
                operation: "Config validation: auth.security.cors.allow_credentials cannot be combined with a '*' origin"
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            // BOOKMARKD_CONFIG names the file itself and is not a setting
            .merge(Env::prefixed("BOOKMARKD_").ignore(&["config"]).split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
