//! Keeps the local gallery state in step with the bucket listing
//!
//! `GallerySync` owns the [`GalleryState`] and is the only thing that mutates
//! it. Every operation awaits at most a few store calls and never holds a lock
//! across them, so independent operations interleave freely: a listing that
//! was requested before a delete can land after it. With
//! [`ListingPolicy::LastWriterWins`] such a listing is applied as-is and the
//! deleted photo reappears until the next refresh; with
//! [`ListingPolicy::DiscardStale`] it is dropped.
//!
//! Failures never propagate to the caller. Each terminal outcome is reported
//! through the [`Notifier`] and returned as an [`Outcome`] for information.

mod error;
mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gallery_storage::{ObjectStore, UploadableFile};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::notifications::{Notifier, Severity};

pub use error::{SyncError, SyncResult, ValidationError};
pub use state::{DragEvent, GalleryState, Outcome, StoredObject};

const INVALID_FILE_MESSAGE: &str = "Please upload an image file";
const UPLOAD_SUCCEEDED_MESSAGE: &str = "Photo uploaded successfully";
const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload photo";
const DELETE_SUCCEEDED_MESSAGE: &str = "Photo deleted successfully";
const DELETE_FAILED_MESSAGE: &str = "Failed to delete photo";
const REFRESH_FAILED_MESSAGE: &str = "Failed to load photos";

/// What to do with a listing that completes after newer local changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingPolicy {
    /// Apply every listing as it lands; the last one to complete wins
    #[default]
    LastWriterWins,
    /// Drop a listing if another refresh started, or a photo was removed
    /// locally, while it was in flight
    DiscardStale,
}

/// Gallery controller
pub struct GallerySync {
    store: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<GalleryState>,
    policy: ListingPolicy,
    epoch: AtomicU64,
}

impl GallerySync {
    /// Creates a controller with an empty gallery
    ///
    /// Call [`GallerySync::refresh`] once to load the initial listing.
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
        policy: ListingPolicy,
    ) -> Self {
        let (state, _) = watch::channel(GalleryState::default());

        Self {
            store,
            notifier,
            state,
            policy,
            epoch: AtomicU64::new(0),
        }
    }

    /// Current state
    #[must_use]
    pub fn snapshot(&self) -> GalleryState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes
    ///
    /// The receiver is notified once per settled mutation. Dropping every
    /// receiver is fine: later mutations are applied and simply not observed.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GalleryState> {
        self.state.subscribe()
    }

    /// Replaces the local objects with the current bucket listing
    pub async fn refresh(&self) -> Outcome {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let objects = match self.fetch_objects().await {
            Ok(objects) => objects,
            Err(e) => {
                self.report_failure(&e, REFRESH_FAILED_MESSAGE);
                return Outcome::Failed;
            }
        };

        if self.policy == ListingPolicy::DiscardStale
            && self.epoch.load(Ordering::SeqCst) != epoch
        {
            debug!("Discarding listing from refresh {epoch}, superseded by newer changes");
            return Outcome::Discarded;
        }

        info!("Gallery refreshed with {} objects", objects.len());
        self.state.send_modify(|state| state.objects = objects);
        Outcome::Applied
    }

    /// Uploads an image and refreshes the gallery
    ///
    /// Files that are missing or not reported as `image/*` are refused
    /// without touching the store or the upload flag.
    pub async fn submit_upload(&self, file: Option<UploadableFile>) -> Outcome {
        let file = match validate(file) {
            Ok(file) => file,
            Err(e) => {
                self.report_failure(&e.into(), INVALID_FILE_MESSAGE);
                return Outcome::Rejected;
            }
        };

        self.set_uploading(true);
        debug!("Uploading {file:?}");

        let outcome = match self.store.upload(file).await {
            Ok(key) => {
                info!("Photo uploaded as {key}");
                self.notifier
                    .notify(Severity::Success, UPLOAD_SUCCEEDED_MESSAGE);
                // the listing, not the returned key, decides what is shown
                self.refresh().await;
                Outcome::Applied
            }
            Err(e) => {
                self.report_failure(&e.into(), UPLOAD_FAILED_MESSAGE);
                Outcome::Failed
            }
        };

        self.set_uploading(false);
        outcome
    }

    /// Deletes a photo and removes it locally without waiting for a listing
    pub async fn submit_delete(&self, key: &str) -> Outcome {
        if let Err(e) = self.store.delete(key).await {
            self.report_failure(&e.into(), DELETE_FAILED_MESSAGE);
            return Outcome::Failed;
        }

        let removed = self.state.send_if_modified(|state| {
            let before = state.objects.len();
            state.objects.retain(|object| object.key != key);
            state.objects.len() != before
        });

        if removed {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            info!("Photo {key} deleted");
        } else {
            debug!("Deleted {key}, which was not in the local gallery");
        }

        self.notifier.notify(Severity::Success, DELETE_SUCCEEDED_MESSAGE);
        Outcome::Applied
    }

    /// Tracks whether something is dragged over the drop zone
    pub fn handle_drag(&self, event: DragEvent) {
        let active = matches!(event, DragEvent::Enter | DragEvent::Over);
        self.state.send_if_modified(|state| {
            std::mem::replace(&mut state.is_drag_active, active) != active
        });
    }

    /// Ends the drag and uploads the first dropped file, ignoring the rest
    pub async fn handle_drop(&self, files: Vec<UploadableFile>) -> Outcome {
        self.handle_drag(DragEvent::Leave);

        let dropped = files.len();
        let Some(file) = files.into_iter().next() else {
            debug!("Drop carried no files");
            return Outcome::Ignored;
        };

        if dropped > 1 {
            debug!("Drop carried {dropped} files, only {} is uploaded", file.name);
        }

        self.submit_upload(Some(file)).await
    }

    async fn fetch_objects(&self) -> SyncResult<Vec<StoredObject>> {
        let listing = self.store.list().await?;

        Ok(listing
            .into_iter()
            .map(|summary| StoredObject {
                display_url: self.store.url_for(&summary.key),
                key: summary.key,
            })
            .collect())
    }

    fn set_uploading(&self, uploading: bool) {
        self.state.send_if_modified(|state| {
            std::mem::replace(&mut state.is_uploading, uploading) != uploading
        });
    }

    fn report_failure(&self, error: &SyncError, message: &str) {
        match error {
            SyncError::Validation(e) => warn!("{message}: {e}"),
            SyncError::Transport(e) => error!("{message}: {e}"),
        }
        self.notifier.notify(Severity::Error, message);
    }
}

fn validate(file: Option<UploadableFile>) -> Result<UploadableFile, ValidationError> {
    let file = file.ok_or(ValidationError::MissingFile)?;

    if !file.is_image() {
        return Err(ValidationError::NotAnImage {
            name: file.name,
            mime_type: file.mime_type,
        });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_a_file() {
        assert_eq!(validate(None).unwrap_err(), ValidationError::MissingFile);
    }

    #[test]
    fn test_validate_rejects_non_image_mime() {
        let file = UploadableFile::new("notes.txt", "text/plain", b"hello".to_vec());

        assert_eq!(
            validate(Some(file)).unwrap_err(),
            ValidationError::NotAnImage {
                name: "notes.txt".to_string(),
                mime_type: "text/plain".to_string(),
            }
        );
    }

    #[test]
    fn test_validate_trusts_reported_mime() {
        let mislabeled = UploadableFile::new("notes.txt", "image/jpeg", b"hello".to_vec());
        assert!(validate(Some(mislabeled)).is_ok());

        let unlabeled = UploadableFile::new("real.png", "", vec![0x89, b'P', b'N', b'G']);
        assert!(validate(Some(unlabeled)).is_err());
    }
}
