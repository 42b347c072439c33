mod docs;
mod health;
/// Version 1 of the gallery API
pub mod v1;

use aide::axum::{routing::get, ApiRouter};

pub(crate) use docs::describe_api;

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .nest("/v1", v1::handler())
}
