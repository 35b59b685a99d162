//! OpenAPI specification for the portal's JSON API

use utoipa::OpenApi;

use crate::handlers::{
    AuthorizeResponse, HealthResponse, MenuEntry, SessionResponse,
};

/// OpenAPI document for the JSON endpoints under `/api`
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taxing Solutions Portal API",
        version = "0.1.0",
        description = "Session and authorization introspection for the Taxing Solutions portal",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,
        crate::handlers::current_session,
        crate::handlers::authorize_session,
    ),
    components(
        schemas(
            HealthResponse,
            MenuEntry,
            SessionResponse,
            AuthorizeResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Session", description = "Session and route guard decisions"),
    )
)]
pub struct ApiDoc;

/// Get the OpenAPI specification as JSON
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}
