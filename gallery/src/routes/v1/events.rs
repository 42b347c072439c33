use std::sync::Arc;

use axum::{
    response::sse::{Event, KeepAlive, Sse},
    Extension,
};
use futures::{stream, Stream};

use crate::sync::GallerySync;

/// Streams the gallery state: once on connect, then after every change
///
/// Changes that happen faster than the client reads are coalesced into the
/// latest state.
pub async fn stream(
    Extension(gallery): Extension<Arc<GallerySync>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let mut receiver = gallery.subscribe();
    receiver.mark_changed();

    let events = stream::unfold(receiver, |mut receiver| async move {
        receiver.changed().await.ok()?;
        let state = receiver.borrow_and_update().clone();
        Some((Event::default().event("state").json_data(state), receiver))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
