//! Gallery state as seen by the UI

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A stored photo together with the URL it is displayed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    /// Object key in the bucket
    pub key: String,
    /// Public URL derived from the key
    pub display_url: String,
}

/// Everything the UI renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryState {
    /// Stored photos in listing order
    pub objects: Vec<StoredObject>,
    /// Whether an upload is in flight
    pub is_uploading: bool,
    /// Whether something is being dragged over the drop zone
    pub is_drag_active: bool,
}

impl GalleryState {
    /// Keys of the stored photos, in order
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.objects.iter().map(|object| object.key.as_str()).collect()
    }
}

/// Drag-and-drop events of the drop zone, apart from the drop itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DragEvent {
    /// Something was dragged into the drop zone
    Enter,
    /// Something is being dragged over the drop zone
    Over,
    /// The drag left the drop zone
    Leave,
}

/// What a gallery operation ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The remote call succeeded and local state reflects it
    Applied,
    /// The file was refused before any remote call
    Rejected,
    /// The remote call failed, local state is unchanged
    Failed,
    /// A listing arrived after newer changes and was dropped
    Discarded,
    /// There was nothing to do
    Ignored,
}
