// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use inventory_server::{
    api::router,
    config::{AuthConfig, BootstrapAdmin, ServerConfig},
    logging,
    models::Role,
    state::AppState,
    store::{InMemoryStore, NewUser, StoreError},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server_config = ServerConfig::from_env()?;
    logging::init(server_config.log_format);

    // Refuse to start without a signing secret.
    let auth_config = AuthConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "invalid auth configuration"))?;

    let mut store = InMemoryStore::new();
    if let Some(admin) = &server_config.bootstrap_admin {
        bootstrap_admin(&mut store, admin)?;
    }

    let state = AppState::new(store, &auth_config);
    let app = router(state);

    let addr = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        algorithm = ?auth_config.algorithm(),
        token_lifetime_secs = auth_config.token_lifetime_secs(),
        "Inventory server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn bootstrap_admin(store: &mut InMemoryStore, admin: &BootstrapAdmin) -> Result<(), StoreError> {
    let company_id = match store.company_by_name(&admin.company) {
        Some(company) => company.id,
        None => store.insert_company(admin.company.clone()).id,
    };

    let user = store.insert_user(NewUser {
        username: admin.username.clone(),
        email: admin.email.clone(),
        password: admin.password.clone(),
        role: Role::Admin,
        company_id: Some(company_id),
    })?;

    tracing::info!(user_id = user.id, username = %user.username, company_id, "bootstrap admin created");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
