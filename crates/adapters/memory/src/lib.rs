//! # winctl-adapter-memory
//!
//! In-memory implementation of the `EntityStore` port.
//!
//! Entities live in a sorted map guarded by a lock; every `set_value` is
//! broadcast to subscribers through a tokio [`broadcast`] channel. Nothing is
//! persisted, so the daemon provisions its entities again on every start.
//!
//! A store can be built with a *visibility lag*: entities created through
//! [`EntityStore::create`] only become readable (and writable) after the lag
//! has elapsed. This reproduces the behaviour of home-automation stores that
//! acknowledge a create before the entity is queryable.
//!
//! ## Dependency rule
//!
//! Depends on `winctl-app` (port traits) and `winctl-domain` only.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use winctl_app::ports::EntityStore;
use winctl_domain::entity::{EntityDefinition, EntityRecord, StateValue};
use winctl_domain::error::{NotFoundError, WinctlError};
use winctl_domain::event::StateChange;
use winctl_domain::path::EntityPath;

const DEFAULT_CAPACITY: usize = 256;

struct Slot {
    definition: EntityDefinition,
    value: Option<StateValue>,
    visible_at: Instant,
}

impl Slot {
    fn is_visible(&self) -> bool {
        self.visible_at <= Instant::now()
    }

    fn record(&self, path: &EntityPath) -> EntityRecord {
        EntityRecord {
            path: path.clone(),
            definition: self.definition.clone(),
            value: self.value.clone(),
        }
    }
}

/// Entity store backed by a map in memory.
pub struct MemoryEntityStore {
    entities: RwLock<BTreeMap<EntityPath, Slot>>,
    sender: broadcast::Sender<StateChange>,
    visibility_lag: Duration,
}

impl MemoryEntityStore {
    /// Create an empty store whose change channel buffers `capacity` changes
    /// per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            entities: RwLock::new(BTreeMap::new()),
            sender,
            visibility_lag: Duration::ZERO,
        }
    }

    /// Delay before a created entity becomes visible.
    #[must_use]
    pub fn with_visibility_lag(mut self, lag: Duration) -> Self {
        self.visibility_lag = lag;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<EntityPath, Slot>> {
        self.entities.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<EntityPath, Slot>> {
        self.entities.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, path: &EntityPath, value: StateValue, ack: bool) -> Result<StateChange, WinctlError> {
        let mut entities = self.write();
        let slot = entities
            .get_mut(path)
            .filter(|slot| slot.is_visible())
            .ok_or_else(|| NotFoundError {
                entity: "Entity",
                id: path.to_string(),
            })?;
        slot.definition.check_value(path, &value)?;
        slot.value = Some(value.clone());
        drop(entities);

        let change = StateChange::new(path.clone(), value, ack);
        // No subscribers is fine: the change is simply not observed.
        let _ = self.sender.send(change.clone());
        tracing::trace!(%path, value = %change.value, ack, "entity value written");
        Ok(change)
    }
}

impl Default for MemoryEntityStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EntityStore for MemoryEntityStore {
    fn exists(&self, path: &EntityPath) -> impl Future<Output = Result<bool, WinctlError>> + Send {
        let exists = self.read().get(path).is_some_and(Slot::is_visible);
        async move { Ok(exists) }
    }

    fn create(
        &self,
        path: &EntityPath,
        definition: EntityDefinition,
    ) -> impl Future<Output = Result<(), WinctlError>> + Send {
        let slot = Slot {
            definition,
            value: None,
            visible_at: Instant::now() + self.visibility_lag,
        };
        self.write().insert(path.clone(), slot);
        tracing::trace!(%path, "entity created");
        async { Ok(()) }
    }

    fn set_value(
        &self,
        path: &EntityPath,
        value: StateValue,
        ack: bool,
    ) -> impl Future<Output = Result<StateChange, WinctlError>> + Send {
        let result = self.apply(path, value, ack);
        async move { result }
    }

    fn get(
        &self,
        path: &EntityPath,
    ) -> impl Future<Output = Result<Option<EntityRecord>, WinctlError>> + Send {
        let record = self
            .read()
            .get(path)
            .filter(|slot| slot.is_visible())
            .map(|slot| slot.record(path));
        async move { Ok(record) }
    }

    fn list(&self) -> impl Future<Output = Result<Vec<EntityRecord>, WinctlError>> + Send {
        let records = self
            .read()
            .iter()
            .filter(|(_, slot)| slot.is_visible())
            .map(|(path, slot)| slot.record(path))
            .collect();
        async move { Ok(records) }
    }

    fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winctl_domain::entity::ValueType;
    use winctl_domain::error::ValidationError;

    fn button_path() -> EntityPath {
        EntityPath::from("0_userdata.0.Control-PC.PC-John.shutdown")
    }

    async fn store_with_button() -> MemoryEntityStore {
        let store = MemoryEntityStore::default();
        store
            .create(&button_path(), EntityDefinition::button("Command: shutdown"))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn should_report_created_entity_as_existing() {
        let store = store_with_button().await;

        assert!(store.exists(&button_path()).await.unwrap());
        assert!(!store.exists(&EntityPath::from("0_userdata.0.other")).await.unwrap());
    }

    #[tokio::test]
    async fn should_read_back_written_value() {
        let store = store_with_button().await;
        store
            .set_value(&button_path(), StateValue::Bool(false), true)
            .await
            .unwrap();

        let record = store.get(&button_path()).await.unwrap().unwrap();
        assert_eq!(record.value, Some(StateValue::Bool(false)));
        assert_eq!(record.definition.name, "Command: shutdown");
    }

    #[tokio::test]
    async fn should_notify_subscribers_on_write() {
        let store = store_with_button().await;
        let mut rx = store.subscribe();

        store
            .set_value(&button_path(), StateValue::Bool(true), false)
            .await
            .unwrap();

        let change = rx.recv().await.unwrap();
        assert_eq!(change.path, button_path());
        assert_eq!(change.value, StateValue::Bool(true));
        assert!(!change.ack);
    }

    #[tokio::test]
    async fn should_not_deliver_changes_written_before_subscription() {
        let store = store_with_button().await;
        store
            .set_value(&button_path(), StateValue::Bool(false), true)
            .await
            .unwrap();

        let mut rx = store.subscribe();
        store
            .set_value(&button_path(), StateValue::Bool(true), false)
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().value, StateValue::Bool(true));
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let store = store_with_button().await;
        let result = store.set_value(&button_path(), StateValue::Bool(true), false).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_return_not_found_when_writing_unknown_entity() {
        let store = MemoryEntityStore::default();

        let result = store.set_value(&button_path(), StateValue::Bool(true), false).await;

        assert!(matches!(result, Err(WinctlError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_reject_value_of_wrong_type() {
        let store = store_with_button().await;

        let result = store
            .set_value(&button_path(), StateValue::from("yes"), false)
            .await;

        assert!(matches!(
            result,
            Err(WinctlError::Validation(ValidationError::TypeMismatch {
                expected: ValueType::Boolean,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn should_list_entities_in_path_order() {
        let store = store_with_button().await;
        store
            .create(
                &EntityPath::from("0_userdata.0.Control-PC.PC-John.reboot"),
                EntityDefinition::button("Command: reboot"),
            )
            .await
            .unwrap();

        let paths: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.path.to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                "0_userdata.0.Control-PC.PC-John.reboot",
                "0_userdata.0.Control-PC.PC-John.shutdown",
            ]
        );
    }

    #[tokio::test]
    async fn should_reset_value_when_recreated() {
        let store = store_with_button().await;
        store
            .set_value(&button_path(), StateValue::Bool(true), false)
            .await
            .unwrap();

        store
            .create(&button_path(), EntityDefinition::button("Command: shutdown"))
            .await
            .unwrap();

        assert_eq!(store.get(&button_path()).await.unwrap().unwrap().value, None);
    }

    #[tokio::test(start_paused = true)]
    async fn should_hide_entity_until_visibility_lag_elapsed() {
        let store = MemoryEntityStore::default().with_visibility_lag(Duration::from_millis(300));
        store
            .create(&button_path(), EntityDefinition::button("Command: shutdown"))
            .await
            .unwrap();

        assert!(!store.exists(&button_path()).await.unwrap());
        assert!(store.get(&button_path()).await.unwrap().is_none());
        assert!(
            store
                .set_value(&button_path(), StateValue::Bool(false), true)
                .await
                .is_err()
        );

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(store.exists(&button_path()).await.unwrap());
        assert!(
            store
                .set_value(&button_path(), StateValue::Bool(false), true)
                .await
                .is_ok()
        );
    }
}
