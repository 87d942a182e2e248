use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::auth::{LogoutRequest, LogoutResponse};
use crate::models::{
    ClientResponse, CreateClientRequest, ErrorResponse, LoginRequest, RefreshTokenRequest,
    RegisterRequest, TokenResponse, UserResponse, ValidateTokenRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::refresh_token,
        crate::handlers::auth::validate_token,
        crate::handlers::auth::profile,
        crate::handlers::auth::logout,
        crate::handlers::clients::create_client,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        RefreshTokenRequest,
        ValidateTokenRequest,
        CreateClientRequest,
        LogoutRequest,
        LogoutResponse,
        TokenResponse,
        UserResponse,
        ClientResponse,
        ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Credential and token lifecycle"),
        (name = "Clients", description = "Trusted calling applications")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
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
}
