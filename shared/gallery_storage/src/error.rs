//! Error types for object store operations

use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::{
    delete_object::DeleteObjectError, list_objects_v2::ListObjectsV2Error,
    put_object::PutObjectError,
};
use thiserror::Error;

/// Result type alias for object store operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Any failure reported by the remote store: auth, network, not-found or a
/// service error
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to put an object into S3
    #[error("Failed to put object into S3: {0:?}")]
    PutObject(#[from] SdkError<PutObjectError>),

    /// Failed to delete an object from S3
    #[error("Failed to delete object from S3: {0:?}")]
    DeleteObject(#[from] SdkError<DeleteObjectError>),

    /// Failed to list the objects of the bucket
    #[error("Failed to list objects in S3: {0:?}")]
    ListObjects(#[from] SdkError<ListObjectsV2Error>),

    /// The store could not be reached at all
    #[error("Object store unavailable: {0}")]
    Unavailable(String),
}
