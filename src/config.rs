// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! immutable configuration structs built from them at startup. Configuration
//! is read once in `main` and shared read-only afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET_KEY` | HMAC secret used to sign tokens | Required (or `SECRET_KEY`) |
//! | `SECRET_KEY` | Fallback signing secret | None |
//! | `JWT_ALGORITHM` | Signing algorithm (`HS256`, `HS384`, `HS512`) | `HS256` |
//! | `JWT_EXPIRES_IN` | Token lifetime in seconds | `3600` |
//! | `BOOTSTRAP_ADMIN_PASSWORD` | Creates an admin account at startup when set | None |
//! | `BOOTSTRAP_ADMIN_USERNAME` | Username of the bootstrap admin | `admin` |
//! | `BOOTSTRAP_ADMIN_EMAIL` | Email of the bootstrap admin | `admin@example.com` |
//! | `BOOTSTRAP_COMPANY` | Company of the bootstrap admin | `Admin Company` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::str::FromStr;

use jsonwebtoken::Algorithm;
use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";
pub const JWT_ALGORITHM_ENV: &str = "JWT_ALGORITHM";
pub const JWT_EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN";
pub const BOOTSTRAP_ADMIN_PASSWORD_ENV: &str = "BOOTSTRAP_ADMIN_PASSWORD";
pub const BOOTSTRAP_ADMIN_USERNAME_ENV: &str = "BOOTSTRAP_ADMIN_USERNAME";
pub const BOOTSTRAP_ADMIN_EMAIL_ENV: &str = "BOOTSTRAP_ADMIN_EMAIL";
pub const BOOTSTRAP_COMPANY_ENV: &str = "BOOTSTRAP_COMPANY";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::HS256;
/// One hour.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Fatal startup configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret key is not configured (set JWT_SECRET_KEY or SECRET_KEY)")]
    MissingSecret,
    #[error("unsupported signing algorithm '{0}' (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Token signing configuration.
///
/// Built once at startup. There is no way to construct one with an empty
/// secret.
#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    algorithm: Algorithm,
    token_lifetime_secs: i64,
}

impl AuthConfig {
    /// Create a configuration with the default algorithm and lifetime.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self {
            secret,
            algorithm: DEFAULT_ALGORITHM,
            token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
        })
    }

    /// Set the signing algorithm. Only the HMAC family is accepted since
    /// tokens are signed with a shared secret.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Result<Self, ConfigError> {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                self.algorithm = algorithm;
                Ok(self)
            }
            other => Err(ConfigError::UnsupportedAlgorithm(format!("{other:?}"))),
        }
    }

    /// Set the token lifetime in seconds.
    pub fn with_token_lifetime(mut self, secs: i64) -> Result<Self, ConfigError> {
        if secs <= 0 {
            return Err(ConfigError::InvalidNumber {
                name: JWT_EXPIRES_IN_ENV,
                value: secs.to_string(),
            });
        }
        self.token_lifetime_secs = secs;
        Ok(self)
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// `JWT_SECRET_KEY` wins over `SECRET_KEY`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let secret = non_empty(JWT_SECRET_KEY_ENV)
            .or_else(|| non_empty(SECRET_KEY_ENV))
            .ok_or(ConfigError::MissingSecret)?;

        let mut config = Self::new(secret)?;

        if let Some(raw) = non_empty(JWT_ALGORITHM_ENV) {
            let algorithm = Algorithm::from_str(raw.trim())
                .map_err(|_| ConfigError::UnsupportedAlgorithm(raw.clone()))?;
            config = config.with_algorithm(algorithm)?;
        }

        if let Some(raw) = non_empty(JWT_EXPIRES_IN_ENV) {
            let secs = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: JWT_EXPIRES_IN_ENV,
                    value: raw.clone(),
                })?;
            config = config.with_token_lifetime(secs)?;
        }

        Ok(config)
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn token_lifetime_secs(&self) -> i64 {
        self.token_lifetime_secs
    }
}

// The secret must never end up in logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .finish()
    }
}

/// Logging output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Account created at startup so an empty in-memory server can log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
    pub company: String,
}

/// HTTP server and process settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let host = non_empty(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                name: PORT_ENV,
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match non_empty(LOG_FORMAT_ENV).as_deref() {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let bootstrap_admin = non_empty(BOOTSTRAP_ADMIN_PASSWORD_ENV).map(|password| BootstrapAdmin {
            username: non_empty(BOOTSTRAP_ADMIN_USERNAME_ENV).unwrap_or_else(|| "admin".to_string()),
            email: non_empty(BOOTSTRAP_ADMIN_EMAIL_ENV)
                .unwrap_or_else(|| "admin@example.com".to_string()),
            password,
            company: non_empty(BOOTSTRAP_COMPANY_ENV)
                .unwrap_or_else(|| "Admin Company".to_string()),
        });

        Ok(Self {
            host,
            port,
            log_format,
            bootstrap_admin,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
