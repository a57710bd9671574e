use crate::api::handlers::{auth, health, rug_requests};
use crate::api::openapi::ApiDoc;
use crate::auth::{middleware::require_auth, TokenService};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Largest accepted request body. Enforced by the body extractors, so an
/// oversized body is rejected with a JSON 413.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Path the OpenAPI document is served from.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Public routes plus the `/admin` tree behind the authentication gate.
pub fn create_router(tokens: Arc<TokenService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/health", get(health::health))
        .route("/rug-request", post(rug_requests::submit_rug_request))
        .route("/login", post(auth::login));

    let admin_routes = Router::new()
        .route("/new-admin", post(auth::create_admin))
        .route("/rug-requests", get(rug_requests::list_rug_requests))
        .route(
            "/rug-requests/completed",
            get(rug_requests::list_completed_requests),
        )
        .route(
            "/rug-request/{id}",
            put(rug_requests::update_rug_request_status).delete(rug_requests::delete_rug_request),
        )
        .route_layer(middleware::from_fn_with_state(tokens, require_auth));

    public_routes.nest("/admin", admin_routes)
}

/// Builds the complete application: routes, API docs, CORS, tracing and the
/// body size limit, bound to `state`.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins());

    create_router(state.tokens.clone())
        .merge(docs_router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy; an empty origin list allows any origin.
pub fn cors_layer(origins: &[axum::http::HeaderValue]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().cloned())
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT_ENCODING,
            header::CONTENT_LENGTH,
            HeaderName::from_static("x-csrf-token"),
        ])
}

#[cfg(feature = "swagger-ui")]
fn docs_router() -> Router<AppState> {
    use utoipa_swagger_ui::SwaggerUi;

    SwaggerUi::new("/swagger-ui")
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_router() -> Router<AppState> {
    Router::new().route(
        OPENAPI_PATH,
        get(|| async { axum::Json(ApiDoc::openapi()) }),
    )
}
