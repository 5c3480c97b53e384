//! Entity store port: the key/value store holding every entity.
//!
//! The store may acknowledge a `create` before the entity can be read back.
//! Callers that write a value right after creating must tolerate that.

use std::future::Future;

use tokio::sync::broadcast;

use winctl_domain::entity::{EntityDefinition, EntityRecord, StateValue};
use winctl_domain::error::WinctlError;
use winctl_domain::event::StateChange;
use winctl_domain::path::EntityPath;

/// Create, read, write and watch entities.
pub trait EntityStore {
    /// Whether an entity exists (and is visible) at `path`.
    fn exists(&self, path: &EntityPath) -> impl Future<Output = Result<bool, WinctlError>> + Send;

    /// Create or overwrite the entity at `path`.
    fn create(
        &self,
        path: &EntityPath,
        definition: EntityDefinition,
    ) -> impl Future<Output = Result<(), WinctlError>> + Send;

    /// Write a value and notify subscribers.
    ///
    /// `ack` is `false` for commands (a user pressing a button) and `true`
    /// for confirmed values.
    fn set_value(
        &self,
        path: &EntityPath,
        value: StateValue,
        ack: bool,
    ) -> impl Future<Output = Result<StateChange, WinctlError>> + Send;

    fn get(
        &self,
        path: &EntityPath,
    ) -> impl Future<Output = Result<Option<EntityRecord>, WinctlError>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<EntityRecord>, WinctlError>> + Send;

    /// Receive every change written *after* this call.
    fn subscribe(&self) -> broadcast::Receiver<StateChange>;
}

impl<T: EntityStore + Send + Sync> EntityStore for std::sync::Arc<T> {
    fn exists(&self, path: &EntityPath) -> impl Future<Output = Result<bool, WinctlError>> + Send {
        (**self).exists(path)
    }

    fn create(
        &self,
        path: &EntityPath,
        definition: EntityDefinition,
    ) -> impl Future<Output = Result<(), WinctlError>> + Send {
        (**self).create(path, definition)
    }

    fn set_value(
        &self,
        path: &EntityPath,
        value: StateValue,
        ack: bool,
    ) -> impl Future<Output = Result<StateChange, WinctlError>> + Send {
        (**self).set_value(path, value, ack)
    }

    fn get(
        &self,
        path: &EntityPath,
    ) -> impl Future<Output = Result<Option<EntityRecord>, WinctlError>> + Send {
        (**self).get(path)
    }

    fn list(&self) -> impl Future<Output = Result<Vec<EntityRecord>, WinctlError>> + Send {
        (**self).list()
    }

    fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        (**self).subscribe()
    }
}
