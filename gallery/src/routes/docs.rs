//! Interactive API reference for the gallery routes
//!
//! The reference page and the OpenAPI document are only served outside
//! production.

use aide::{
    axum::ApiRouter,
    openapi::OpenApi,
    scalar::Scalar,
    transform::TransformOpenApi,
};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Json,
};

use crate::types::Environment;

const OPENAPI_PATH: &str = "/openapi.json";

/// Routes serving the reference page and the OpenAPI document
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .route("/docs", get(reference_page))
        .route(OPENAPI_PATH, get(openapi_schema))
}

/// Top-level metadata of the generated OpenAPI document
pub fn describe_api(api: TransformOpenApi<'_>) -> TransformOpenApi<'_> {
    api.title("Photo Gallery")
        .version(env!("CARGO_PKG_VERSION"))
        .description(
            "Uploads, lists and deletes photos in an S3 bucket. Operation routes answer \
             with their outcome and the gallery state once it settled.",
        )
}

#[allow(clippy::unused_async)]
async fn reference_page(Extension(environment): Extension<Environment>) -> Response {
    if !environment.show_api_docs() {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(Scalar::new(OPENAPI_PATH).with_title("Photo Gallery API").html()).into_response()
}

#[allow(clippy::unused_async)]
async fn openapi_schema(
    Extension(environment): Extension<Environment>,
    Extension(openapi): Extension<OpenApi>,
) -> Response {
    if !environment.show_api_docs() {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(openapi).into_response()
}
