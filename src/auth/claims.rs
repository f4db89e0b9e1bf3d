// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims carried by access tokens.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::User;

/// Claims embedded in every access token.
///
/// Built fresh for each issuance and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id, as a decimal string.
    #[serde(deserialize_with = "subject_from_string_or_number")]
    pub sub: String,

    pub username: String,

    pub email: String,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Build claims for `user`, valid from `now` for `lifetime_secs`.
    pub fn for_user(user: &User, now: i64, lifetime_secs: i64) -> Self {
        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now.saturating_add(lifetime_secs),
        }
    }

    /// The numeric user id in `sub`, if it is one.
    pub fn subject_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Accept `sub` either as a string or as a bare integer; tokens minted by
/// older deployments used the integer form.
fn subject_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Subject {
        Text(String),
        Number(i64),
    }

    Ok(match Subject::deserialize(deserializer)? {
        Subject::Text(s) => s,
        Subject::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn sample_user() -> User {
        User {
            id: 7,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
            company_id: Some(1),
        }
    }

    #[test]
    fn for_user_copies_identity_and_window() {
        let claims = TokenClaims::for_user(&sample_user(), 1_700_000_000, 3600);
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_003_600);
        assert_eq!(claims.subject_id(), Some(7));
    }

    #[test]
    fn subject_accepts_integer_form() {
        let claims: TokenClaims = serde_json::from_str(
            r#"{"sub":7,"username":"admin","email":"a@b.c","iat":1,"exp":2}"#,
        )
        .unwrap();
        assert_eq!(claims.subject_id(), Some(7));
    }

    #[test]
    fn non_numeric_subject_has_no_id() {
        let mut claims = TokenClaims::for_user(&sample_user(), 0, 1);
        claims.sub = "user_123".to_string();
        assert_eq!(claims.subject_id(), None);
    }

    #[test]
    fn serializes_wire_claim_names() {
        let claims = TokenClaims::for_user(&sample_user(), 10, 5);
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "7");
        assert_eq!(json["iat"], 10);
        assert_eq!(json["exp"], 15);
        assert!(json.get("role").is_none());
    }
}
