use crate::types::AppError;
use axum::extract::{rejection::JsonRejection, FromRequest};

/// `axum::Json` whose rejections render as the crate's `{"error": ...}` body.
///
/// Keeps the rejection's status (400, 413, 415, 422) but replaces axum's
/// plain-text body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "request body rejected");
        AppError::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
