//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (login, admin provisioning).
pub mod auth;
/// Liveness endpoint.
pub mod health;
/// Rug request submission and administration.
pub mod rug_requests;
