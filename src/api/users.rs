// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;

use crate::auth::CurrentUser;
use crate::models::User;

/// Get the current authenticated user.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = User),
        (status = 401, description = "Missing, expired or invalid token, or unknown user"),
    )
)]
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
