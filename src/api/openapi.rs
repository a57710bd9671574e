// OpenAPI document for the rugs API, served by the router and available to
// library users who want to export it.

use crate::api::handlers::{auth, health, rug_requests};
use crate::types::{
    AdminCreatedResponse, CompletedRequestsResponse, LoginRequest, MessageResponse,
    NewAdminRequest, NewRugRequest, RequestStatus, RugRequest, SubmitRugRequestResponse,
    TokenResponse, UpdateStatusRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the rugs API
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        rug_requests::submit_rug_request,
        auth::login,
        auth::create_admin,
        rug_requests::list_rug_requests,
        rug_requests::list_completed_requests,
        rug_requests::update_rug_request_status,
        rug_requests::delete_rug_request,
    ),
    components(
        schemas(
            health::HealthResponse,
            RugRequest, RequestStatus, NewRugRequest, SubmitRugRequestResponse,
            UpdateStatusRequest, CompletedRequestsResponse, MessageResponse,
            LoginRequest, TokenResponse, NewAdminRequest, AdminCreatedResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness"),
        (name = "rug-requests", description = "Public rug request submission"),
        (name = "auth", description = "Admin login"),
        (name = "admin", description = "Token-protected administration endpoints")
    ),
    info(
        title = "Custom Rugs API",
        description = "Order intake and administration for custom rugs",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` JWT scheme referenced by the admin paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
