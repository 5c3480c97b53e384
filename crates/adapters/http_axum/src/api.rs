//! JSON API handler modules.

pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod entities;
pub mod sse;

use axum::Router;
use axum::routing::get;

use winctl_app::ports::EntityStore;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: EntityStore + Send + Sync + 'static,
{
    Router::new()
        // Entities
        .route("/entities", get(entities::list::<S>))
        .route(
            "/entities/{*path}",
            get(entities::get::<S>).put(entities::set_value::<S>),
        )
        // Devices
        .route("/devices", get(devices::list::<S>))
        // Events
        .route("/events/stream", get(sse::stream::<S>))
}
