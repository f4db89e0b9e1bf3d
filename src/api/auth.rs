// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance endpoint.

use axum::{extract::State, Json};

use crate::{
    auth::AuthError,
    models::{LoginRequest, TokenResponse},
    state::AppState,
};

/// Exchange a username and password for an access token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let store = state.store.clone();
    let username = request.username.clone();

    // bcrypt blocks for a noticeable time; run it off the async workers.
    let user = tokio::task::spawn_blocking(move || {
        store
            .blocking_read()
            .verify_credentials(&request.username, &request.password)
    })
    .await
    .map_err(|e| AuthError::Internal(format!("credential check panicked: {e}")))?;

    let Some(user) = user else {
        tracing::warn!(username = %username, "login rejected");
        return Err(AuthError::InvalidCredentials);
    };

    let access_token = state.tokens.issue(&user)?;
    tracing::info!(user_id = user.id, "access token issued");

    Ok(Json(TokenResponse::bearer(
        access_token,
        state.tokens.lifetime_secs(),
    )))
}
