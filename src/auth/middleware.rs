use crate::auth::{AuthError, TokenService};
use crate::types::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

const BEARER_PREFIX: &str = "Bearer ";

/// Per-call outcome of the authentication gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No `Authorization` header.
    NoCredential,
    /// Header present but malformed, or the token failed verification.
    InvalidCredential,
    /// Token verified for this principal.
    Authenticated(Uuid),
}

impl GateState {
    /// Classifies the result of [`authorize`].
    pub fn of(outcome: &Result<Uuid, AuthError>) -> Self {
        match outcome {
            Ok(principal) => GateState::Authenticated(*principal),
            Err(AuthError::MissingCredential) => GateState::NoCredential,
            Err(_) => GateState::InvalidCredential,
        }
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?;

    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedCredential),
    }
}

/// Extracts and verifies the bearer token carried by `headers`.
pub fn authorize(tokens: &TokenService, headers: &HeaderMap) -> Result<Uuid, AuthError> {
    let token = extract_bearer(headers)?;
    tokens.verify(token)
}

/// Authentication gate for the admin routes.
///
/// Rejects with 401 before the downstream handler runs unless the request
/// carries a valid bearer token. On success the principal is available to
/// handlers through [`AuthUser`].
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = authorize(&tokens, req.headers());

    match GateState::of(&outcome) {
        GateState::Authenticated(principal) => {
            req.extensions_mut().insert(AuthUser(principal));
            Ok(next.run(req).await)
        }
        state => {
            tracing::debug!(
                ?state,
                method = %req.method(),
                path = %req.uri().path(),
                "request rejected by auth gate"
            );
            Err(outcome.err().unwrap_or(AuthError::InvalidToken).into())
        }
    }
}

/// The authenticated principal, available to handlers behind [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::Auth(AuthError::MissingCredential))
    }
}
