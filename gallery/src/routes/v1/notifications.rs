use std::sync::Arc;

use axum::{Extension, Json};
use schemars::JsonSchema;
use serde::Serialize;

use crate::notifications::{Notification, Severity, ToastBoard};

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct NotificationResponse {
    /// Board-unique id, increasing in issue order
    id: u64,
    severity: Severity,
    message: String,
    /// ISO-8601 UTC timestamp of when the notification was issued
    issued_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            severity: notification.severity,
            message: notification.message,
            issued_at: notification.issued_at.to_rfc3339(),
        }
    }
}

/// Lists the notifications that have not been dismissed yet, oldest first
pub async fn list_notifications(
    Extension(toasts): Extension<Arc<ToastBoard>>,
) -> Json<Vec<NotificationResponse>> {
    Json(toasts.active().into_iter().map(Into::into).collect())
}
