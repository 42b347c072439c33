use std::sync::Arc;

use aide::axum::IntoApiResponse;
use axum::{Extension, Json};
use schemars::JsonSchema;
use serde::Serialize;

use crate::sync::GallerySync;

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    /// Version of the running build
    semver: &'static str,
    /// Commit hash of the build, when `GIT_REV` was set at compile time
    rev: Option<&'static str>,
    /// Photos currently shown, from the last applied listing
    photo_count: usize,
}

/// Liveness check
///
/// Never calls the bucket; `photoCount` reflects the local gallery state.
pub async fn handler(Extension(gallery): Extension<Arc<GallerySync>>) -> impl IntoApiResponse {
    Json(HealthResponse {
        status: "ok",
        semver: env!("CARGO_PKG_VERSION"),
        rev: option_env!("GIT_REV"),
        photo_count: gallery.snapshot().objects.len(),
    })
}
