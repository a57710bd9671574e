//! Rug request handlers.
//!
//! Submission is public; listing, status changes and deletion sit behind the
//! admin gate.

use crate::{
    api::extract::ApiJson,
    auth::AuthUser,
    types::{
        AppError, CompletedRequestsResponse, MessageResponse, NewRugRequest, RequestStatus, Result,
        RugRequest, SubmitRugRequestResponse, UpdateStatusRequest,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// Submit a new rug request
#[utoipa::path(
    post,
    path = "/rug-request",
    request_body = NewRugRequest,
    responses(
        (status = 201, description = "Request stored with status PENDING", body = SubmitRugRequestResponse),
        (status = 400, description = "Missing or invalid fields")
    ),
    tag = "rug-requests"
)]
pub async fn submit_rug_request(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewRugRequest>,
) -> Result<(StatusCode, Json<SubmitRugRequestResponse>)> {
    payload.validate()?;

    let request = state.store.create_rug_request(&payload).await?;
    tracing::info!(request_id = request.id, "rug request submitted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitRugRequestResponse {
            message: "Rug request submitted successfully!".to_string(),
            request,
        }),
    ))
}

/// List every rug request, newest first
#[utoipa::path(
    get,
    path = "/admin/rug-requests",
    responses(
        (status = 200, description = "All requests", body = Vec<RugRequest>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn list_rug_requests(State(state): State<AppState>) -> Result<Json<Vec<RugRequest>>> {
    Ok(Json(state.store.list_rug_requests().await?))
}

/// List completed rug requests
#[utoipa::path(
    get,
    path = "/admin/rug-requests/completed",
    responses(
        (status = 200, description = "Completed requests", body = CompletedRequestsResponse),
        (status = 404, description = "No completed requests", body = CompletedRequestsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn list_completed_requests(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CompletedRequestsResponse>)> {
    let requests = state
        .store
        .list_rug_requests_by_status(RequestStatus::Completed)
        .await?;

    if requests.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(CompletedRequestsResponse {
                requests,
                count: 0,
                message: "No completed requests found".to_string(),
            }),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(CompletedRequestsResponse {
            count: requests.len(),
            requests,
            message: "Completed requests retrieved successfully".to_string(),
        }),
    ))
}

/// Change the status of a rug request
#[utoipa::path(
    put,
    path = "/admin/rug-request/{id}",
    params(
        ("id" = i64, Path, description = "Rug request ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Invalid ID or status"),
        (status = 404, description = "Request not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn update_rug_request_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>> {
    let id = parse_request_id(&id)?;
    let status: RequestStatus = payload.status.parse()?;

    if !state.store.update_rug_request_status(id, status).await? {
        return Err(AppError::NotFound("Request not found".to_string()));
    }

    tracing::info!(request_id = id, %status, %principal, "rug request status updated");
    Ok(Json(MessageResponse::new(
        "Request status updated successfully",
    )))
}

/// Delete a rug request
#[utoipa::path(
    delete,
    path = "/admin/rug-request/{id}",
    params(
        ("id" = i64, Path, description = "Rug request ID")
    ),
    responses(
        (status = 200, description = "Request deleted", body = MessageResponse),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Request not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn delete_rug_request(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_request_id(&id)?;

    if !state.store.delete_rug_request(id).await? {
        return Err(AppError::NotFound("Rug request not found".to_string()));
    }

    tracing::info!(request_id = id, %principal, "rug request deleted");
    Ok(Json(MessageResponse::new("Rug request deleted successfully")))
}

fn parse_request_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| AppError::InvalidInput("Invalid request ID".to_string()))
}
