//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for the rugs server, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::openapi`](crate::api::openapi) - OpenAPI document
//! - [`api::extract`](crate::api::extract) - `ApiJson` body extractor
//!
//! # API Endpoints
//!
//! ## Public
//! - `GET /health` - Health check endpoint
//! - `POST /rug-request` - Submit a rug request
//! - `POST /login` - Exchange admin credentials for a JWT
//!
//! ## Admin (`/admin`)
//! - `POST /admin/new-admin` - Provision another admin
//! - `GET /admin/rug-requests` - List all requests
//! - `GET /admin/rug-requests/completed` - List completed requests
//! - `PUT /admin/rug-request/{id}` - Change a request's status
//! - `DELETE /admin/rug-request/{id}` - Delete a request
//!
//! Every error, including a malformed or oversized body, is returned as
//! `{"error": "<reason>"}`.
//!
//! # Authentication
//!
//! Every `/admin` endpoint requires a valid JWT token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! The document is served at `/api-docs/openapi.json`. When the `swagger-ui`
//! feature is enabled, interactive API documentation is available at `/swagger-ui/`.

/// JSON body extractor with JSON error bodies.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// OpenAPI document.
pub mod openapi;
/// Router configuration and route definitions.
pub mod routes;
