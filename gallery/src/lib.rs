//! Photo gallery kept in sync with an S3 bucket
//!
//! [`sync::GallerySync`] owns the gallery state and talks to the bucket through
//! a [`gallery_storage::ObjectStore`]; the HTTP surface in [`routes`] projects
//! that state and forwards user actions to it.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// User-facing notifications
pub mod notifications;

/// HTTP routes
pub mod routes;

/// HTTP server
pub mod server;

/// Gallery state synchronisation
pub mod sync;

/// Configuration and API error types
pub mod types;
