//! Shared application state for axum handlers.

use std::sync::Arc;

use winctl_app::ports::EntityStore;
use winctl_domain::device::Device;
use winctl_domain::path::EntityPath;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the store itself does not need to be
/// `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<S> {
    /// Entity store shared with the bridge.
    pub store: Arc<S>,
    /// Configured devices.
    pub devices: Arc<[Device]>,
    /// Common prefix of every device entity.
    pub base: EntityPath,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            devices: Arc::clone(&self.devices),
            base: self.base.clone(),
        }
    }
}

impl<S> AppState<S>
where
    S: EntityStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, devices: Vec<Device>, base: EntityPath) -> Self {
        Self {
            store,
            devices: devices.into(),
            base,
        }
    }
}
