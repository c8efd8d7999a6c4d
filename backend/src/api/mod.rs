//! API module
//!
//! Contains HTTP request handlers for the PDF and image utility endpoints,
//! and the OpenAPI document describing them.

pub mod files;
pub mod utils;

use crate::error::ErrorResponse;
use crate::state::AppState;
use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Re-export file API for convenience
pub use files::*;

/// Prefix every utility route is mounted under
pub const API_PREFIX: &str = "/api/v1/utility";

/// Where the generated OpenAPI JSON is served
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI document for the utility routes
#[derive(OpenApi)]
#[openapi(
    paths(
        files::get_pdf_page,
        files::list_pdf_files,
        files::list_pdf_directories,
        files::get_pdf_page_count,
        files::get_image,
        files::list_image_files,
    ),
    components(schemas(ErrorResponse)),
    tags((name = "UTILITIES", description = "PDF rasterization, image serving and resource listings"))
)]
pub struct ApiDoc;

/// Build the utility API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(API_PREFIX, utility_routes())
        .with_state(state)
}

/// Swagger UI at `/swagger-ui`, backed by the generated document
pub fn docs() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
}

fn utility_routes() -> Router<AppState> {
    Router::new()
        .route("/pdf", get(get_pdf_page))
        .route("/pdf/list", get(list_pdf_files))
        .route("/pdf/listdir", get(list_pdf_directories))
        .route("/pdf/numpages", get(get_pdf_page_count))
        .route("/image", get(get_image))
        .route("/image/list", get(list_image_files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn openapi_json() -> Value {
        serde_json::to_value(ApiDoc::openapi()).expect("OpenAPI document should serialize")
    }

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = openapi_json();
        for route in ["/pdf", "/pdf/list", "/pdf/listdir", "/pdf/numpages", "/image", "/image/list"] {
            let path = format!("{}{}", API_PREFIX, route);
            let get = &doc["paths"][path.as_str()]["get"];
            assert!(get.is_object(), "missing GET {}", path);
            assert_eq!(get["tags"][0], "UTILITIES");
        }
    }

    #[test]
    fn test_openapi_query_parameters() {
        let doc = openapi_json();
        let params = doc["paths"]["/api/v1/utility/pdf"]["get"]["parameters"]
            .as_array()
            .expect("GET /pdf should document its parameters")
            .clone();

        let required = |name: &str| {
            params
                .iter()
                .find(|p| p["name"] == name)
                .unwrap_or_else(|| panic!("parameter {} not documented", name))["required"]
                .as_bool()
                .unwrap_or(false)
        };

        assert!(params.iter().all(|p| p["in"] == "query"));
        assert!(required("filename"));
        assert!(required("pagenumber"));
        assert!(!required("directoryname"));
    }

    #[test]
    fn test_openapi_error_schema() {
        let doc = openapi_json();
        assert!(doc["components"]["schemas"]["ErrorResponse"].is_object());
    }
}
