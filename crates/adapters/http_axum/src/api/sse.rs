//! Server-Sent Events (SSE) stream of entity changes.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use winctl_app::ports::EntityStore;

use crate::state::AppState;

/// `GET /api/events/stream`: every state change as a JSON `data:` frame.
///
/// The stream continues until the client disconnects or the store is dropped.
pub async fn stream<S>(
    State(state): State<AppState<S>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    S: EntityStore + Send + Sync + 'static,
{
    let changes = BroadcastStream::new(state.store.subscribe()).filter_map(|result| match result {
        Ok(change) => match serde_json::to_string(&change) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize state change for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some changes were dropped");
            None
        }
    });

    Sse::new(changes).keep_alive(KeepAlive::default())
}
