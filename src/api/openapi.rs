//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{equipment, health, notify, session};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Equipment Registry API",
        version = "1.0.0",
        description = "Register equipment items with QR lookup codes"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Session
        session::get_session,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::register_equipment,
        // Notifications
        notify::relay_notification,
    ),
    components(
        schemas(
            crate::models::equipment::EquipmentRecord,
            crate::models::equipment::RegisterEquipmentForm,
            crate::models::equipment::RegistrationReceipt,
            crate::models::session::Submitter,
            crate::models::form::FormStatus,
            session::SessionResponse,
            notify::NotifyRequest,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Session and form state"),
        (name = "equipment", description = "Equipment registration"),
        (name = "notify", description = "Chat webhook relay")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
