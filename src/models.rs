// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain Models
//!
//! Types shared by the persistence layer and the authentication core.
//! Keeping [`User`] and [`UserLookup`] here means `auth` never has to reach
//! into `store`, and `store` never has to know about tokens.
//!
//! ## Model Categories
//!
//! - **Users**: the authenticated principal, with role and company
//! - **Companies**: tenant a user belongs to
//! - **Auth payloads**: login request and token response bodies

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Roles
// =============================================================================

/// User role tag.
///
/// - `Admin` - Company administrator
/// - `User` - Regular member of a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Least privilege, used when no role is recorded.
    #[default]
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

// =============================================================================
// Companies
// =============================================================================

/// A tenant. Users are affiliated with at most one company.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Users
// =============================================================================

/// A stored user, and the principal resolved for authenticated requests.
///
/// The password hash is kept by the store and never travels on this type.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    /// Unique numeric identifier (the token `sub` claim).
    pub id: i64,
    /// Unique login name.
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Company affiliation, if any.
    pub company_id: Option<i64>,
}

/// Point read of a user by primary key.
///
/// Implemented by the persistence layer and consumed by the authenticator.
/// Implementations must not scan or mutate.
pub trait UserLookup {
    fn lookup_user_by_id(&self, id: i64) -> Option<User>;
}

// =============================================================================
// Auth Payloads
// =============================================================================

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}
