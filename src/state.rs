// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::TokenCodec;
use crate::config::AuthConfig;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    /// Read-only after startup.
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(store: InMemoryStore, auth_config: &AuthConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens: Arc::new(TokenCodec::new(auth_config)),
        }
    }
}
