// OpenAPI document served by Swagger UI

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::auth::models::{LoginResponse, RegisterRequest};
use crate::companies::models::{Company, CompanyRequest, CompanyType};
use crate::error::ErrorResponse;
use crate::models::MessageResponse;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::handlers::register_handler,
        crate::auth::handlers::login_handler,
        crate::companies::handlers::get_company_handler,
        crate::companies::handlers::create_company_handler,
        crate::companies::handlers::update_company_handler,
        crate::companies::handlers::delete_company_handler,
        crate::health::health_handler,
    ),
    components(
        schemas(
            Company,
            CompanyType,
            CompanyRequest,
            RegisterRequest,
            LoginResponse,
            MessageResponse,
            ErrorResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "companies", description = "Company management endpoints"),
        (name = "health", description = "Liveness, served on HEALTH_PORT")
    ),
    info(
        title = "Company API",
        version = "1.0.0",
        description = "Company registry with JWT authentication and domain events"
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected routes
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
