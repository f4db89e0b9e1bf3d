// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential extraction and the `CurrentUser` extractor.
//!
//! Use the `CurrentUser` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     // user is the stored User the token was issued for
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{
    middleware::{resolve_principal, verified_subject},
    AuthError,
};
use crate::models::User;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Read the bearer token from the `Authorization` header.
///
/// Only the exact, case-sensitive `Bearer ` scheme is recognized. Returns
/// `None` when the header is absent, not valid UTF-8, uses another scheme, or
/// carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// The authenticated principal for the current request.
///
/// Behind [`require_auth`](super::require_auth) this reads the user the
/// middleware placed in the request extensions. On a route without the
/// middleware it authenticates the request itself, so a handler can opt in
/// to authentication just by taking this argument.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>().cloned() {
            return Ok(CurrentUser(user));
        }

        let user_id = verified_subject(&parts.headers, &state.tokens)?;
        let user = resolve_principal(user_id, &*state.store.read().await)?;
        Ok(CurrentUser(user))
    }
}
