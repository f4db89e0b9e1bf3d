// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token issuance and verification.
//!
//! Tokens are HMAC-signed JWTs. Verification is stateless: a token is valid
//! while its signature checks out against the configured secret and `exp` is
//! still in the future. There is no revocation list.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{claims::TokenClaims, AuthError};
use crate::config::AuthConfig;
use crate::models::User;

/// Signs and verifies access tokens with the process-wide [`AuthConfig`].
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    lifetime_secs: i64,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let algorithm = config.algorithm();

        // Only the configured algorithm is accepted. Expiry is checked by
        // `verify_at` against an explicit clock, with no leeway.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            algorithm,
            lifetime_secs: config.token_lifetime_secs(),
            validation,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issue a token for `user`, valid from now.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now().timestamp())
    }

    /// Issue a token for `user` as if the current time were `now`.
    pub fn issue_at(&self, user: &User, now: i64) -> Result<String, AuthError> {
        let claims = TokenClaims::for_user(user, now, self.lifetime_secs);
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify `token` as if the current time were `now`.
    ///
    /// Returns [`AuthError::ExpiredToken`] only for a correctly signed token
    /// with `now >= exp`. Every other failure is [`AuthError::InvalidToken`].
    pub fn verify_at(&self, token: &str, now: i64) -> Result<TokenClaims, AuthError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token failed to decode");
                AuthError::InvalidToken
            })?
            .claims;

        if claims.subject_id().is_none() {
            tracing::debug!("token subject is not a user id");
            return Err(AuthError::InvalidToken);
        }

        if claims.iat > now {
            tracing::debug!(iat = claims.iat, now, "token issued in the future");
            return Err(AuthError::InvalidToken);
        }

        if now >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }
}
