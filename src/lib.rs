//! # Custom Rugs Server
//!
//! HTTP backend for a custom-rug business: customers submit rug requests,
//! admins log in with email and password and manage those requests with a
//! bearer token.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `rugs-server` binary
//! 2. **As a library** - Build the router around your own state, for
//!    instance in integration tests
//!
//! ### Building the application
//!
//! ```rust,ignore
//! use rugs::{AppState, RugStore, RugsConfig, TokenService, PasswordHasher};
//!
//! let config = RugsConfig::load_or_default("rugs.toml")?;
//! let tokens = TokenService::new(config.jwt_secret()?)?;
//! let store = RugStore::open(&config.database.url).await?;
//! let state = AppState::new(config, store, tokens, PasswordHasher::default())?;
//!
//! let app = rugs::api::routes::build_app(state);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `swagger-ui` | Serve interactive API docs at `/swagger-ui/` |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Token service, password hashing, login and the authentication gate
//! - [`db`] - SQLite persistence
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - Configuration and logging
//! - [`cli`] - Command-line interface

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// JWT authentication and middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Database client (libsql/SQLite).
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::{LoginService, PasswordHasher, TokenService};
pub use db::RugStore;
pub use types::{AppError, Result};
pub use utils::toml_config::RugsConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based infrastructure configuration, fixed at startup
    pub config: Arc<RugsConfig>,
    /// Database client
    pub store: Arc<RugStore>,
    /// Token issuing and verification
    pub tokens: Arc<TokenService>,
    /// Email/password login
    pub login: Arc<LoginService>,
    /// Password hasher for provisioning admins
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Wires the shared services together.
    ///
    /// Computes one bcrypt hash for the login service, so this blocks for as
    /// long as a single hash at the hasher's cost takes.
    pub fn new(
        config: RugsConfig,
        store: RugStore,
        tokens: TokenService,
        hasher: PasswordHasher,
    ) -> Result<Self> {
        let tokens = Arc::new(tokens);
        let login = LoginService::new(hasher, tokens.clone())?;

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            tokens,
            login: Arc::new(login),
            hasher,
        })
    }
}
