//! Error types for gallery operations

use gallery_storage::TransportError;
use thiserror::Error;

/// Result type alias for gallery operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Why a file was refused before reaching the store
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No file was offered
    #[error("No file was provided")]
    MissingFile,

    /// The reported MIME type is not an image type
    #[error("Not an image: {name} reported as {mime_type:?}")]
    NotAnImage {
        /// Reported file name
        name: String,
        /// Reported MIME type
        mime_type: String,
    },
}

/// Errors raised inside the gallery controller
///
/// These never leave the controller: each one becomes a notification.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The offered file cannot be uploaded
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The object store call failed
    #[error(transparent)]
    Transport(#[from] TransportError),
}
