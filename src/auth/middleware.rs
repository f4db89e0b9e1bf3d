// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authentication and the route guard middleware.
//!
//! [`authenticate`] resolves who is making a request. [`require_auth`] wraps
//! protected routes with it:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/users/me", get(users::get_current_user))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         require_auth,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{extractor::bearer_token, token::TokenCodec, AuthError};
use crate::models::{User, UserLookup};
use crate::state::AppState;

/// Resolve the user behind the bearer token in `headers`.
///
/// 1. no bearer token → [`AuthError::MissingToken`]
/// 2. token fails verification → [`AuthError::ExpiredToken`] or [`AuthError::InvalidToken`]
/// 3. subject has no stored user → [`AuthError::UnknownPrincipal`]
pub fn authenticate<L>(headers: &HeaderMap, tokens: &TokenCodec, users: &L) -> Result<User, AuthError>
where
    L: UserLookup + ?Sized,
{
    let user_id = verified_subject(headers, tokens)?;
    resolve_principal(user_id, users)
}

/// Steps 1 and 2 of [`authenticate`]: the user id named by a valid token.
///
/// Needs no store access, so callers holding a lock can run this first.
pub fn verified_subject(headers: &HeaderMap, tokens: &TokenCodec) -> Result<i64, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    let claims = tokens.verify(token)?;

    // verify() guarantees a numeric subject.
    claims.subject_id().ok_or(AuthError::InvalidToken)
}

/// Step 3 of [`authenticate`].
pub fn resolve_principal<L>(user_id: i64, users: &L) -> Result<User, AuthError>
where
    L: UserLookup + ?Sized,
{
    users
        .lookup_user_by_id(user_id)
        .ok_or(AuthError::UnknownPrincipal)
}

/// Route guard.
///
/// Rejects the request with a 401 unless it carries a valid bearer token for
/// an existing user. On success the [`User`] is inserted into the request
/// extensions for this request only, and the wrapped handler's response is
/// returned unchanged.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let result = match verified_subject(request.headers(), &state.tokens) {
        Ok(user_id) => resolve_principal(user_id, &*state.store.read().await),
        Err(err) => Err(err),
    };

    match result {
        Ok(user) => {
            tracing::debug!(user_id = user.id, path = %request.uri().path(), "request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                reason = err.kind(),
                method = %request.method(),
                path = %request.uri().path(),
                "request rejected by auth guard"
            );
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::models::Role;
    use crate::store::{InMemoryStore, NewUser};
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use chrono::Utc;
    use std::collections::HashMap;
    use tower::ServiceExt;

    struct MapLookup(HashMap<i64, User>);

    impl UserLookup for MapLookup {
        fn lookup_user_by_id(&self, id: i64) -> Option<User> {
            self.0.get(&id).cloned()
        }
    }

    fn admin() -> User {
        User {
            id: 7,
            username: "admin".into(),
            email: "admin@example.com".into(),
            role: Role::Admin,
            company_id: None,
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&AuthConfig::new("test-secret").unwrap())
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn authenticate_resolves_principal() {
        let tokens = codec();
        let users = MapLookup(HashMap::from([(7, admin())]));
        let token = tokens.issue(&admin()).unwrap();

        assert_eq!(authenticate(&bearer(&token), &tokens, &users), Ok(admin()));
    }

    #[test]
    fn authenticate_without_header_is_missing_token() {
        let users = MapLookup(HashMap::new());
        assert_eq!(
            authenticate(&HeaderMap::new(), &codec(), &users),
            Err(AuthError::MissingToken)
        );

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(authenticate(&headers, &codec(), &users), Err(AuthError::MissingToken));
    }

    #[test]
    fn authenticate_propagates_codec_failures() {
        let tokens = codec();
        let users = MapLookup(HashMap::from([(7, admin())]));

        assert_eq!(
            authenticate(&bearer("garbage"), &tokens, &users),
            Err(AuthError::InvalidToken)
        );

        let issued_long_ago = Utc::now().timestamp() - 2 * tokens.lifetime_secs();
        let expired = tokens.issue_at(&admin(), issued_long_ago).unwrap();
        assert_eq!(
            authenticate(&bearer(&expired), &tokens, &users),
            Err(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn authenticate_tolerates_deleted_user() {
        let tokens = codec();
        let token = tokens.issue(&admin()).unwrap();
        let users = MapLookup(HashMap::new());

        assert_eq!(
            authenticate(&bearer(&token), &tokens, &users),
            Err(AuthError::UnknownPrincipal)
        );
    }

    fn guarded_app() -> (Router, AppState, User) {
        let mut store = InMemoryStore::new();
        let user = store
            .insert_user_with_id(
                7,
                NewUser {
                    username: "admin".into(),
                    email: "admin@example.com".into(),
                    password: "admin123".into(),
                    role: Role::Admin,
                    company_id: None,
                },
            )
            .unwrap();
        let state = AppState::new(store, &AuthConfig::new("test-secret").unwrap());

        let app = Router::new()
            .route(
                "/protected",
                get(|Extension(user): Extension<User>| async move { user.username }),
            )
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state.clone());

        (app, state, user)
    }

    async fn call(app: Router, authorization: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn guard_forwards_authenticated_request() {
        let (app, state, user) = guarded_app();
        let token = state.tokens.issue(&user).unwrap();

        let (status, body) = call(app, Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "admin");
    }

    #[tokio::test]
    async fn guard_rejects_missing_token() {
        let (app, _, _) = guarded_app();
        let (status, body) = call(app, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"Missing bearer token"}"#);
    }

    #[tokio::test]
    async fn guard_rejects_unknown_user() {
        let (app, state, user) = guarded_app();
        let token = state.tokens.issue(&user).unwrap();
        state.store.write().await.delete_user(user.id).unwrap();

        let (status, body) = call(app, Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"User not found"}"#);
    }

    #[tokio::test]
    async fn guard_rejects_invalid_token() {
        let (app, _, _) = guarded_app();
        let (status, body) = call(app, Some("Bearer not.a.token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"Invalid token"}"#);
    }

    #[tokio::test]
    async fn guard_rejects_expired_token() {
        let (app, state, user) = guarded_app();
        let issued_long_ago = Utc::now().timestamp() - 2 * state.tokens.lifetime_secs();
        let token = state.tokens.issue_at(&user, issued_long_ago).unwrap();

        let (status, body) = call(app, Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"Token expired"}"#);
    }

    #[tokio::test]
    async fn guard_verifies_token_without_store_lock() {
        let (app, state, _) = guarded_app();
        let _writer = state.store.write().await;

        let (status, body) = call(app, Some("Bearer not.a.token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"Invalid token"}"#);
    }
}
