// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Authentication error type.
///
/// The `Display` text of every client-facing variant is exactly the
/// `message` returned in the response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header
    #[error("Missing bearer token")]
    MissingToken,
    /// Signature valid but `exp` has passed
    #[error("Token expired")]
    ExpiredToken,
    /// Any other decode failure: bad signature, wrong algorithm, garbage
    #[error("Invalid token")]
    InvalidToken,
    /// Token subject no longer matches a stored user
    #[error("User not found")]
    UnknownPrincipal,
    /// Login with a wrong username or password
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: String,
}

impl AuthError {
    /// Stable identifier used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::UnknownPrincipal => "unknown_principal",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::ExpiredToken
            | AuthError::InvalidToken
            | AuthError::UnknownPrincipal
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AuthError::Internal(detail) => {
                tracing::error!(error = %detail, "authentication failed internally");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(AuthErrorBody { message })).into_response()
    }
}
