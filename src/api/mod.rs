//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Endpoints are mounted at the root (no version prefix) to match the
//! published contract of the battle log API.

pub mod docs;
pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
///
/// With the `swagger-ui` feature enabled (default), Swagger UI is served at
/// `/docs` with the OpenAPI document at `/api-docs/openapi.json`.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
    };

    router
}
