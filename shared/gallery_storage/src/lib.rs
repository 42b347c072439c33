//! Object storage access for the photo gallery
//!
//! This crate wraps the remote bucket behind the [`ObjectStore`] trait so the
//! gallery controller never talks to the AWS SDK directly. The production
//! implementation is [`S3ObjectStore`]; tests use the in-memory store from the
//! `mock` module (enabled with the `test-utils` feature).

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod error;
mod file;
mod s3;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

use uuid::Uuid;

pub use error::{TransportError, TransportResult};
pub use file::UploadableFile;
pub use s3::{ListingMode, S3ObjectStore};

/// One entry of a bucket listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key as stored in the bucket
    pub key: String,
}

impl ObjectSummary {
    /// Creates a listing entry for `key`
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Remote bucket operations used by the gallery
///
/// Every remote operation is a single call: implementations never retry and
/// never back off. Callers decide what a failure means.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `file` under a freshly generated key and returns that key
    ///
    /// The caller is responsible for checking that the file is an image.
    async fn upload(&self, file: UploadableFile) -> TransportResult<String>;

    /// Deletes the object stored under `key`
    ///
    /// Deleting a key that does not exist succeeds, so success says nothing
    /// about prior existence.
    async fn delete(&self, key: &str) -> TransportResult<()>;

    /// Lists the objects currently stored in the bucket
    async fn list(&self) -> TransportResult<Vec<ObjectSummary>>;

    /// Public URL of the object stored under `key`
    ///
    /// Purely local: the object may not exist or may not be readable.
    fn url_for(&self, key: &str) -> String;
}

/// Generates the key an uploaded file is stored under: `{uuid}-{file_name}`
#[must_use]
pub fn generate_object_key(file_name: &str) -> String {
    format!("{}-{file_name}", Uuid::new_v4())
}

/// Builds the virtual-hosted public URL of an object
#[must_use]
pub fn public_object_url(bucket_name: &str, region: &str, key: &str) -> String {
    format!("https://{bucket_name}.s3.{region}.amazonaws.com/{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_is_uuid_prefixed() {
        let key = generate_object_key("holiday photo.jpg");

        let (prefix, name) = key.split_at(36);
        assert!(Uuid::parse_str(prefix).is_ok(), "prefix was {prefix}");
        assert_eq!(name, "-holiday photo.jpg");
    }

    #[test]
    fn test_generated_keys_are_unique() {
        assert_ne!(generate_object_key("a.png"), generate_object_key("a.png"));
    }

    #[test]
    fn test_public_object_url_template() {
        assert_eq!(
            public_object_url("photos", "eu-west-1", "abc-cat.png"),
            "https://photos.s3.eu-west-1.amazonaws.com/abc-cat.png"
        );
    }

    #[test]
    fn test_public_object_url_keeps_key_verbatim() {
        assert_eq!(
            public_object_url("", "", "my photo.png"),
            "https://.s3..amazonaws.com/my photo.png"
        );
    }
}
