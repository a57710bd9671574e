use crate::{
    api::extract::ApiJson,
    auth::AuthUser,
    types::{AdminCreatedResponse, AppError, LoginRequest, NewAdminRequest, Result, TokenResponse},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let token = state
        .login
        .authenticate(state.store.as_ref(), &payload.email, &payload.pass)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Provision another admin account
#[utoipa::path(
    post,
    path = "/admin/new-admin",
    request_body = NewAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = AdminCreatedResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already registered")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn create_admin(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(payload): ApiJson<NewAdminRequest>,
) -> Result<(StatusCode, Json<AdminCreatedResponse>)> {
    payload.validate()?;

    if state
        .store
        .get_admin_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "An admin with this email already exists".to_string(),
        ));
    }

    let password_hash = state.hasher.hash_password_async(payload.pass).await?;

    let user_id = Uuid::new_v4();
    state
        .store
        .create_admin(user_id, &payload.name, &payload.email, &password_hash)
        .await?;

    tracing::info!(%user_id, created_by = %principal, "admin account created");
    Ok((StatusCode::CREATED, Json(AdminCreatedResponse { user_id })))
}
