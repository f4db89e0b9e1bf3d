// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless JWT bearer authentication for the inventory API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with username/password and receives a signed token
//! 2. Client sends `Authorization: Bearer <token>`
//! 3. Server:
//!    - Verifies the HMAC signature with the configured secret and algorithm
//!    - Rejects the token once `exp` is reached
//!    - Looks up `sub` → stored user by primary key
//!
//! ## Failure Responses
//!
//! All rejections are `401` with a JSON `message`:
//! `Missing bearer token`, `Token expired`, `Invalid token`, `User not found`.
//!
//! ## Security
//!
//! - No server-side sessions or revocation; the token lifetime is the only
//!   expiry control
//! - Only the configured algorithm is accepted
//! - No clock skew leeway

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod token;

pub use claims::TokenClaims;
pub use error::AuthError;
pub use extractor::{bearer_token, CurrentUser};
pub use middleware::{authenticate, require_auth};
pub use token::TokenCodec;
