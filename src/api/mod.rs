// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    models::{Company, LoginRequest, Role, TokenResponse, User},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    // Every route in here requires a valid bearer token.
    let protected = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let api_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .merge(protected);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        users::get_current_user,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            User,
            Company,
            Role,
            LoginRequest,
            TokenResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Auth", description = "Token issuance"),
        (name = "Users", description = "Authenticated user information"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::store::InMemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(InMemoryStore::new(), &AuthConfig::new("s").unwrap()))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn public_and_protected_routes_are_mounted() {
        assert_eq!(status_of("/health/live").await, StatusCode::OK);
        assert_eq!(status_of("/api-doc/openapi.json").await, StatusCode::OK);
        assert_eq!(status_of("/api/users/me").await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of("/api/nope").await, StatusCode::NOT_FOUND);
    }

    #[test]
    fn openapi_declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("bearer"));
        assert!(doc.paths.paths.contains_key("/api/users/me"));
    }
}
