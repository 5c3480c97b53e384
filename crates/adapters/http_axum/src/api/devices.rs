//! JSON handlers for devices.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use winctl_app::ports::EntityStore;
use winctl_domain::path::EntityPath;

use crate::state::AppState;

/// A configured device together with the path its entities live under.
#[derive(Debug, Serialize)]
pub struct DeviceView {
    pub name: String,
    pub address: String,
    pub path: EntityPath,
}

/// `GET /api/devices`
pub async fn list<S>(State(state): State<AppState<S>>) -> Json<Vec<DeviceView>>
where
    S: EntityStore + Send + Sync + 'static,
{
    let devices = state
        .devices
        .iter()
        .map(|device| DeviceView {
            name: device.name.clone(),
            address: device.address.clone(),
            path: state.base.child(&device.path_segment()),
        })
        .collect();
    Json(devices)
}
