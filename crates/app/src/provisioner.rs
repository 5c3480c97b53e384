//! Declarative entity provisioner.
//!
//! Creates a batch of entities concurrently and reports back exactly once,
//! after every entity has been skipped, created and initialised, or given up
//! on. A store error never stalls the batch; the entity is counted as failed.
//!
//! Creation is two-phase: the store acknowledges `create` before the entity
//! is readable, so the initial value is written only after a delay of
//! `base_delay + index × stagger`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;

use winctl_domain::entity::EntityDefinition;
use winctl_domain::error::WinctlError;
use winctl_domain::path::{EntityPath, RootNamespace};

use crate::ports::EntityStore;

/// Timing of the delayed value write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionerConfig {
    /// Wait between the create acknowledgement and the value write.
    pub base_delay: Duration,
    /// Extra wait per batch position.
    pub stagger: Duration,
}

impl ProvisionerConfig {
    fn delay_for(&self, index: usize) -> Duration {
        let position = u32::try_from(index).unwrap_or(u32::MAX);
        self.base_delay
            .saturating_add(self.stagger.saturating_mul(position))
    }
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            stagger: Duration::from_millis(20),
        }
    }
}

/// What happened to each entity of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ProvisionReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.skipped + self.failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityOutcome {
    Created,
    Skipped,
    Failed,
}

type Continuation = Box<dyn FnOnce(ProvisionReport) + Send>;

/// Outstanding counter plus the continuation it releases.
struct BatchTracker {
    outstanding: AtomicUsize,
    created: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
    on_complete: Mutex<Option<Continuation>>,
}

impl BatchTracker {
    fn new(len: usize, on_complete: Continuation) -> Self {
        Self {
            outstanding: AtomicUsize::new(len),
            created: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            on_complete: Mutex::new(Some(on_complete)),
        }
    }

    /// Count one entity as processed; the last one fires the continuation.
    fn record(&self, outcome: EntityOutcome) {
        let counter = match outcome {
            EntityOutcome::Created => &self.created,
            EntityOutcome::Skipped => &self.skipped,
            EntityOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.complete();
        }
    }

    fn complete(&self) {
        let continuation = self
            .on_complete
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(continuation) = continuation {
            continuation(self.report());
        }
    }

    fn report(&self) -> ProvisionReport {
        ProvisionReport {
            created: self.created.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Creates batches of entities in an [`EntityStore`].
pub struct Provisioner<S> {
    store: Arc<S>,
    config: ProvisionerConfig,
}

impl<S> Provisioner<S>
where
    S: EntityStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, config: ProvisionerConfig) -> Self {
        Self { store, config }
    }

    /// Start provisioning `batch` under `root` and return its size.
    ///
    /// Paths are placed under `root` when they do not start with it. Each
    /// entity is handled in its own task: existing entities are left alone
    /// unless `force` is set, everything else is created and then given its
    /// initial value. `on_complete` runs exactly once, on whichever task
    /// processes the last entity, or right away for an empty batch.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`WinctlError::Validation`] when `root` is not an accepted
    /// root namespace. Nothing is provisioned and `on_complete` never runs.
    pub fn provision<F>(
        &self,
        root: &str,
        force: bool,
        batch: Vec<(String, EntityDefinition)>,
        on_complete: F,
    ) -> Result<usize, WinctlError>
    where
        F: FnOnce(ProvisionReport) + Send + 'static,
    {
        let root = root.parse::<RootNamespace>().inspect_err(|err| {
            tracing::error!(error = %err, "refusing to provision entities");
        })?;

        let len = batch.len();
        let tracker = Arc::new(BatchTracker::new(len, Box::new(on_complete)));
        if len == 0 {
            tracker.complete();
            return Ok(0);
        }

        tracing::info!(%root, count = len, force, "provisioning entities");
        for (index, (raw, definition)) in batch.into_iter().enumerate() {
            let path = EntityPath::normalize(root, &raw);
            let delay = self.config.delay_for(index);
            let store = Arc::clone(&self.store);
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                let outcome = provision_entity(store.as_ref(), &path, definition, force, delay).await;
                tracker.record(outcome);
            });
        }
        Ok(len)
    }

    /// [`provision`](Self::provision) and wait for the report.
    ///
    /// # Errors
    ///
    /// Returns [`WinctlError::Validation`] for a bad root, or
    /// [`WinctlError::Store`] when the batch was abandoned before completing
    /// (a provisioning task panicked).
    pub async fn provision_and_wait(
        &self,
        root: &str,
        force: bool,
        batch: Vec<(String, EntityDefinition)>,
    ) -> Result<ProvisionReport, WinctlError> {
        let (tx, rx) = oneshot::channel();
        self.provision(root, force, batch, move |report| {
            let _ = tx.send(report);
        })?;
        rx.await.map_err(|err| WinctlError::Store(Box::new(err)))
    }
}

async fn provision_entity<S: EntityStore>(
    store: &S,
    path: &EntityPath,
    definition: EntityDefinition,
    force: bool,
    delay: Duration,
) -> EntityOutcome {
    match store.exists(path).await {
        Ok(true) if !force => {
            tracing::debug!(%path, "entity exists, skipping");
            return EntityOutcome::Skipped;
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(%path, error = %err, "failed to check entity");
            return EntityOutcome::Failed;
        }
    }

    let initial = definition.initial_value();
    if let Err(err) = store.create(path, definition).await {
        tracing::warn!(%path, error = %err, "failed to create entity");
        return EntityOutcome::Failed;
    }

    tokio::time::sleep(delay).await;

    match store.set_value(path, initial, true).await {
        Ok(_) => {
            tracing::debug!(%path, "entity created");
            EntityOutcome::Created
        }
        Err(err) => {
            tracing::warn!(%path, error = %err, "failed to initialise entity");
            EntityOutcome::Failed
        }
    }
}
