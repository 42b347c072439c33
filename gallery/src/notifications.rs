//! User-facing notifications
//!
//! Notifications are fire-and-forget: the controller hands them to a
//! [`Notifier`] and moves on. [`ToastBoard`] stacks them and dismisses each one
//! after a fixed display duration.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{info, warn};

/// Maximum number of toasts kept on the board at once
pub const MAX_TOASTS: usize = 20;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The operation succeeded
    Success,
    /// The operation failed
    Error,
}

/// A notification shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Board-unique id, increasing in issue order
    pub id: u64,
    /// Severity
    pub severity: Severity,
    /// Message shown to the user
    pub message: String,
    /// When the notification was issued
    pub issued_at: DateTime<Utc>,
}

/// Receives notifications
pub trait Notifier: Send + Sync {
    /// Shows `message` to the user; never blocks and never fails
    fn notify(&self, severity: Severity, message: &str);
}

/// Stack of auto-dismissing toasts
pub struct ToastBoard {
    display_duration: Duration,
    next_id: AtomicU64,
    toasts: Mutex<VecDeque<Notification>>,
}

impl ToastBoard {
    /// Creates an empty board whose toasts stay visible for `display_duration`
    #[must_use]
    pub fn new(display_duration: Duration) -> Self {
        Self {
            display_duration,
            next_id: AtomicU64::new(1),
            toasts: Mutex::new(VecDeque::new()),
        }
    }

    /// Toasts still visible now, oldest first
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Utc::now())
    }

    /// Toasts still visible at `now`, oldest first
    ///
    /// Expired toasts are dropped from the board.
    #[must_use]
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        toasts.retain(|toast| !self.is_expired(toast, now));
        toasts.iter().cloned().collect()
    }

    fn is_expired(&self, toast: &Notification, now: DateTime<Utc>) -> bool {
        // a toast issued "in the future" (clock skew) counts as fresh
        (now - toast.issued_at)
            .to_std()
            .is_ok_and(|age| age >= self.display_duration)
    }
}

impl Notifier for ToastBoard {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => info!("Notification: {message}"),
            Severity::Error => warn!("Notification: {message}"),
        }

        let toast = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            severity,
            message: message.to_string(),
            issued_at: Utc::now(),
        };

        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        toasts.push_back(toast);
        while toasts.len() > MAX_TOASTS {
            toasts.pop_front();
        }
    }
}
