//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use crate::inbound::http::links::{
    LinkCollectionResponse, LinkPayload, LinkResponse, SaveLinksRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, PlatformSchema};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "devlinks API",
        description = "Save and read a developer's ordered profile links."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::links::get_my_links,
        crate::inbound::http::links::save_my_links,
        crate::inbound::http::links::get_public_links,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PlatformSchema,
        LoginRequest,
        SaveLinksRequest,
        LinkPayload,
        LinkResponse,
        LinkCollectionResponse,
    )),
    tags(
        (name = "session", description = "Login and logout"),
        (name = "links", description = "Link collection reads and saves"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
