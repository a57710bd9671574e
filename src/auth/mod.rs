//! JWT Authentication and Middleware
//!
//! This module provides the authentication layer that gates the admin API:
//! password hashing for admin accounts, bearer token issuance/validation, and
//! the Axum middleware that sits in front of every `/admin` route.
//!
//! # Module Structure
//!
//! - [`auth::jwt`](crate::auth::jwt) - Token Service: HS256 token issue and verify
//! - [`auth::password`](crate::auth::password) - bcrypt hashing of admin passwords
//! - [`auth::login`](crate::auth::login) - Login flow over a [`PrincipalStore`](crate::auth::login::PrincipalStore)
//! - [`auth::middleware`](crate::auth::middleware) - Authentication gate and `AuthUser` extractor
//!
//! # Flow
//!
//! ```text
//! POST /login {email, pass}
//!     -> PrincipalStore::lookup_credential(email)
//!     -> PasswordHasher::verify_password(pass, stored_hash)
//!     -> TokenService::issue(principal)          => {"token": "..."}
//!
//! GET /admin/... (Authorization: Bearer <token>)
//!     -> extract_bearer -> TokenService::verify  => handler runs with AuthUser
//! ```
//!
//! Tokens are stateless: there is no session table and no revocation. A token
//! stays valid until it expires six hours after issuance.
//!
//! # Configuration
//!
//! The signing secret is read once at startup from the environment variable
//! named in `rugs.toml` and handed to [`TokenService::new`](crate::auth::jwt::TokenService::new).
//! There is no default secret and no way to change it while serving.

use axum::http::StatusCode;

/// Token issuance and verification.
pub mod jwt;
/// Login flow and the principal store boundary.
pub mod login;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Admin password hashing and verification.
pub mod password;

pub use jwt::{Claims, TokenService};
pub use login::{LoginService, PrincipalStore, StoredCredential};
pub use middleware::{AuthUser, GateState};
pub use password::PasswordHasher;

/// Authentication failures.
///
/// The `Display` text of each variant is what the client sees, so it never
/// carries the underlying cause. Callers log the cause separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header on a protected call.
    #[error("Authorization header is required")]
    MissingCredential,

    /// Header present but not of the form `Bearer <token>`.
    #[error("Invalid token format")]
    MalformedCredential,

    /// Signature mismatch, wrong algorithm, expired, or unparsable token.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token construction failed at issuance.
    #[error("Failed to issue token")]
    Signing,

    /// The password hash primitive failed.
    #[error("Failed to process password")]
    Hashing,

    /// Unknown email or wrong password at login.
    #[error("Invalid credentials")]
    CredentialMismatch,
}

impl AuthError {
    /// HTTP status this failure is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedCredential
            | AuthError::InvalidToken
            | AuthError::CredentialMismatch => StatusCode::UNAUTHORIZED,
            AuthError::Signing | AuthError::Hashing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
