use std::sync::Arc;

use axum::{
    extract::{Multipart, Path},
    Extension, Json,
};
use gallery_storage::UploadableFile;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    sync::{DragEvent, GallerySync, GalleryState, Outcome},
    types::AppError,
};

/// Multipart field carrying an uploaded file
pub const FILE_FIELD: &str = "file";

/// Result of a gallery operation
#[derive(Debug, Serialize, JsonSchema)]
pub struct OperationResponse {
    /// What the operation ended up doing
    pub outcome: Outcome,
    /// Gallery state once the operation settled
    pub state: GalleryState,
}

impl OperationResponse {
    fn settled(gallery: &GallerySync, outcome: Outcome) -> Json<Self> {
        Json(Self {
            outcome,
            state: gallery.snapshot(),
        })
    }
}

/// Path parameters of a single photo
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PhotoPath {
    /// Object key of the photo
    pub key: String,
}

/// Drag event sent by the drop zone
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DragRequest {
    /// Drag event reported by the drop zone
    pub event: DragEvent,
}

/// Returns the current gallery state
#[instrument(skip(gallery))]
pub async fn get_state(Extension(gallery): Extension<Arc<GallerySync>>) -> Json<GalleryState> {
    Json(gallery.snapshot())
}

/// Reloads the gallery from the bucket listing
#[instrument(skip(gallery))]
pub async fn refresh(Extension(gallery): Extension<Arc<GallerySync>>) -> Json<OperationResponse> {
    let outcome = gallery.refresh().await;
    OperationResponse::settled(&gallery, outcome)
}

/// Uploads the photo sent in the `file` field
///
/// A request without a `file` field is treated like an empty file picker and
/// reported as a rejected upload.
///
/// # Errors
///
/// Returns a `400` if the body is not valid multipart form data
#[instrument(skip(gallery, multipart))]
pub async fn upload_photo(
    Extension(gallery): Extension<Arc<GallerySync>>,
    mut multipart: Multipart,
) -> Result<Json<OperationResponse>, AppError> {
    let file = read_files(&mut multipart).await?.into_iter().next();
    let outcome = gallery.submit_upload(file).await;
    Ok(OperationResponse::settled(&gallery, outcome))
}

/// Deletes a photo
#[instrument(skip(gallery))]
pub async fn delete_photo(
    Extension(gallery): Extension<Arc<GallerySync>>,
    Path(PhotoPath { key }): Path<PhotoPath>,
) -> Json<OperationResponse> {
    let outcome = gallery.submit_delete(&key).await;
    OperationResponse::settled(&gallery, outcome)
}

/// Reports a drag event of the drop zone
#[instrument(skip(gallery))]
pub async fn drag(
    Extension(gallery): Extension<Arc<GallerySync>>,
    Json(payload): Json<DragRequest>,
) -> Json<GalleryState> {
    gallery.handle_drag(payload.event);
    Json(gallery.snapshot())
}

/// Drops files on the drop zone; only the first one is uploaded
///
/// # Errors
///
/// Returns a `400` if the body is not valid multipart form data
#[instrument(skip(gallery, multipart))]
pub async fn drop_photos(
    Extension(gallery): Extension<Arc<GallerySync>>,
    mut multipart: Multipart,
) -> Result<Json<OperationResponse>, AppError> {
    let files = read_files(&mut multipart).await?;
    let outcome = gallery.handle_drop(files).await;
    Ok(OperationResponse::settled(&gallery, outcome))
}

/// Reads every `file` field, in order, skipping other fields
async fn read_files(multipart: &mut Multipart) -> Result<Vec<UploadableFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        files.push(UploadableFile::new(name, mime_type, bytes.to_vec()));
    }

    Ok(files)
}
