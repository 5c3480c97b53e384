//! JSON handlers for entities.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use winctl_app::ports::EntityStore;
use winctl_domain::entity::{EntityRecord, StateValue};
use winctl_domain::error::{NotFoundError, WinctlError};
use winctl_domain::event::StateChange;
use winctl_domain::path::EntityPath;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for writing an entity value.
#[derive(Deserialize)]
pub struct SetValueRequest {
    pub value: StateValue,
}

/// `GET /api/entities`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<EntityRecord>>, ApiError>
where
    S: EntityStore + Send + Sync + 'static,
{
    let entities = state.store.list().await?;
    Ok(Json(entities))
}

/// `GET /api/entities/{*path}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(path): Path<String>,
) -> Result<Json<EntityRecord>, ApiError>
where
    S: EntityStore + Send + Sync + 'static,
{
    let path = EntityPath::from(path);
    let record = state.store.get(&path).await?.ok_or_else(|| {
        WinctlError::from(NotFoundError {
            entity: "Entity",
            id: path.to_string(),
        })
    })?;
    Ok(Json(record))
}

/// `PUT /api/entities/{*path}`
///
/// Writes the value as a command (`ack = false`), the way a user pressing a
/// button in the home-automation UI would.
pub async fn set_value<S>(
    State(state): State<AppState<S>>,
    Path(path): Path<String>,
    Json(req): Json<SetValueRequest>,
) -> Result<Json<StateChange>, ApiError>
where
    S: EntityStore + Send + Sync + 'static,
{
    let path = EntityPath::from(path);
    tracing::debug!(%path, value = %req.value, "writing entity value");
    let change = state.store.set_value(&path, req.value, false).await?;
    Ok(Json(change))
}
