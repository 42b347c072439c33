//! S3-backed object store

use std::sync::Arc;

use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client as S3Client};
use tracing::{debug, error, info};

use crate::{
    generate_object_key, public_object_url, ObjectStore, ObjectSummary, TransportResult,
    UploadableFile,
};

/// How much of a bucket listing is read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingMode {
    /// Only the first page returned by S3 (up to 1000 keys)
    #[default]
    FirstPage,
    /// Follow continuation tokens until the listing is exhausted
    AllPages,
}

/// Object store client for a single S3 bucket
pub struct S3ObjectStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    region: String,
    listing_mode: ListingMode,
    page_size: Option<i32>,
}

impl S3ObjectStore {
    /// Creates a new object store client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket holding the gallery objects
    /// * `region` - Region of the bucket, used to build public URLs
    /// * `listing_mode` - Whether listings stop after the first page
    #[must_use]
    pub const fn new(
        s3_client: Arc<S3Client>,
        bucket_name: String,
        region: String,
        listing_mode: ListingMode,
    ) -> Self {
        Self {
            s3_client,
            bucket_name,
            region,
            listing_mode,
            page_size: None,
        }
    }

    /// Caps the number of keys S3 returns per listing page
    ///
    /// S3 defaults to (and never exceeds) 1000 keys per page.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Bucket this store writes to
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Reads one page of the listing, returning its keys and the token of the
    /// next page if S3 reported the listing as truncated
    async fn list_page(
        &self,
        continuation_token: Option<String>,
    ) -> TransportResult<(Vec<ObjectSummary>, Option<String>)> {
        let response = self
            .s3_client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .set_max_keys(self.page_size)
            .set_continuation_token(continuation_token)
            .send()
            .await?;

        let objects = response
            .contents()
            .iter()
            .filter_map(|object| object.key())
            .map(ObjectSummary::new)
            .collect();

        let next_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(ToString::to_string)
        } else {
            None
        };

        Ok((objects, next_token))
    }

    async fn list_objects(&self) -> TransportResult<Vec<ObjectSummary>> {
        let (mut objects, mut next_token) = self.list_page(None).await?;

        if self.listing_mode == ListingMode::FirstPage {
            if next_token.is_some() {
                debug!(
                    "Listing of {} is truncated, only the first page is read",
                    self.bucket_name
                );
            }
            return Ok(objects);
        }

        while let Some(token) = next_token {
            let (page, token) = self.list_page(Some(token)).await?;
            objects.extend(page);
            next_token = token;
        }

        Ok(objects)
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, file: UploadableFile) -> TransportResult<String> {
        let key = generate_object_key(&file.name);

        debug!(
            "Uploading {} ({} bytes, {}) to {} as {}",
            file.name,
            file.size(),
            file.mime_type,
            self.bucket_name,
            key
        );

        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(&file.mime_type)
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(file.bytes))
            .send()
            .await
            .inspect_err(|e| {
                error!(
                    "Failed to upload {} to bucket {} in {}: {e:?}",
                    key, self.bucket_name, self.region
                );
            })?;

        info!("Uploaded object: {}", key);
        Ok(key)
    }

    async fn delete(&self, key: &str) -> TransportResult<()> {
        debug!("Deleting object: {}", key);

        self.s3_client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .inspect_err(|e| {
                error!(
                    "Failed to delete {} from bucket {} in {}: {e:?}",
                    key, self.bucket_name, self.region
                );
            })?;

        info!("Deleted object: {}", key);
        Ok(())
    }

    async fn list(&self) -> TransportResult<Vec<ObjectSummary>> {
        debug!("Listing objects in bucket: {}", self.bucket_name);

        let objects = self.list_objects().await.inspect_err(|e| {
            error!(
                "Failed to list bucket {} in {}: {e}",
                self.bucket_name, self.region
            );
        })?;

        info!(
            "Listed {} objects in bucket {}",
            objects.len(),
            self.bucket_name
        );
        Ok(objects)
    }

    fn url_for(&self, key: &str) -> String {
        public_object_url(&self.bucket_name, &self.region, key)
    }
}
