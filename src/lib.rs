// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Inventory Server - multi-tenant inventory backend
//!
//! Users belong to companies and authenticate with signed JWT bearer tokens.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, verification and the route guard
//! - `config` - Startup configuration
//! - `models` - Users, companies and the user lookup seam
//! - `store` - In-memory user and company store

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;
