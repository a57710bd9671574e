//! Request/response types and the crate-wide error.

#![allow(missing_docs)]

use crate::auth::AuthError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

// ============= Rug Request Types =============

/// Lifecycle of a custom rug request.
///
/// Always stored and serialized upper-case; parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::InProgress => "IN_PROGRESS",
            RequestStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "in_progress" => Ok(RequestStatus::InProgress),
            "completed" => Ok(RequestStatus::Completed),
            _ => Err(AppError::InvalidInput("Invalid status value".to_string())),
        }
    }
}

/// A stored rug request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RugRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub details: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /rug-request`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewRugRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub details: String,
}

impl NewRugRequest {
    /// Checks required fields and the email shape.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput("name is required".to_string()));
        }
        if self.details.trim().is_empty() {
            return Err(AppError::InvalidInput("details is required".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::InvalidInput(
                "a valid email is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitRugRequestResponse {
    pub message: String,
    pub request: RugRequest,
}

/// Body of `PUT /admin/rug-request/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompletedRequestsResponse {
    pub requests: Vec<RugRequest>,
    pub count: usize,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============= Authentication Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "password")]
    pub pass: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Body of `POST /admin/new-admin`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewAdminRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "password")]
    pub pass: String,
}

impl NewAdminRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput("name is required".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::InvalidInput(
                "a valid email is required".to_string(),
            ));
        }
        validate_password_strength(&self.pass)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminCreatedResponse {
    pub user_id: Uuid,
}

/// Admin passwords: at least 8 characters, at most 72 bytes (the bcrypt input
/// limit), with at least one upper- and one lower-case letter.
pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.chars().count() < 8 {
        return Err(AppError::InvalidInput(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if password.len() > 72 {
        return Err(AppError::InvalidInput(
            "password must be at most 72 bytes".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) || !password.chars().any(|c| c.is_lowercase())
    {
        return Err(AppError::InvalidInput(
            "password must contain upper- and lower-case letters".to_string(),
        ));
    }
    Ok(())
}

/// Loose address check: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Request body could not be read or decoded; keeps the extractor's 4xx status.
    #[error("Invalid request body: {message}")]
    Body {
        status: axum::http::StatusCode,
        message: String,
    },
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match self {
            AppError::Auth(err) if err.status_code().is_server_error() => {
                tracing::error!(error = ?err, "authentication primitive failed");
                (err.status_code(), "Internal server error".to_string())
            }
            AppError::Auth(err) => (err.status_code(), err.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Body { status, message } => (status, message),
            AppError::Database(msg) | AppError::Config(msg) | AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
