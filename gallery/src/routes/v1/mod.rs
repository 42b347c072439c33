/// Server-sent gallery state updates
pub mod events;
/// Gallery state and photo operations
pub mod gallery;
/// Active toasts
pub mod notifications;

use aide::axum::{
    routing::{delete, get, post},
    ApiRouter,
};

/// Creates the v1 API router with all v1 handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .api_route("/gallery", get(gallery::get_state))
        .api_route("/gallery/refresh", post(gallery::refresh))
        .api_route("/gallery/photos", post(gallery::upload_photo))
        .api_route("/gallery/photos/{key}", delete(gallery::delete_photo))
        .api_route("/gallery/drag", post(gallery::drag))
        .api_route("/gallery/drop", post(gallery::drop_photos))
        .api_route(
            "/gallery/notifications",
            get(notifications::list_notifications),
        )
        // server-sent events are not described by the OpenAPI document
        .route("/gallery/events", axum::routing::get(events::stream))
}
