//! Bootstrap: provisions the device entities, then routes their changes to agents.
//!
//! Two phases, expressed as two types:
//!
//! 1. [`Bootstrap`] (initializing): builds the entity batch from the bridge
//!    configuration, provisions it, waits for the settle delay, subscribes.
//! 2. [`Listener`] (listening): maps every state change to a registration and
//!    dispatches the matching command. It runs until the store goes away.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use winctl_domain::command::{ActionKind, CommandCatalog, SEND_KEY, send_key_definition};
use winctl_domain::device::{Device, validate_devices};
use winctl_domain::entity::EntityDefinition;
use winctl_domain::error::{ValidationError, WinctlError};
use winctl_domain::event::StateChange;
use winctl_domain::lookup::lookup;
use winctl_domain::path::{EntityPath, RootNamespace, resolve_root};

use crate::dispatcher::{CommandDispatcher, DispatchOutcome};
use crate::ports::{EntityStore, RemoteAgent};
use crate::provisioner::{ProvisionReport, Provisioner, ProvisionerConfig};

/// Immutable configuration of the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub devices: Vec<Device>,
    /// Extra commands registered in the agents' command lists.
    pub user_commands: Vec<String>,
    /// Where device entities live, with or without a root namespace.
    pub state_path: String,
    /// Recreate entities that already exist.
    pub force: bool,
    /// Wait between provisioning and subscribing.
    pub settle_delay: Duration,
    pub provisioner: ProvisionerConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            user_commands: Vec::new(),
            state_path: "Control-PC".to_string(),
            force: false,
            settle_delay: Duration::from_secs(2),
            provisioner: ProvisionerConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Check the state path, the devices and the user commands.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        resolve_root(&self.state_path)?;
        validate_devices(&self.devices)?;
        CommandCatalog::new(&self.user_commands)?;
        Ok(())
    }
}

/// What a change to a routed entity triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Run `command` when the button becomes `true`.
    Button(String),
    /// Send the new value as a key stroke.
    SendKey,
}

/// Context attached to a routed entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Unsanitized device name, used for the host lookup.
    pub device: String,
    pub trigger: Trigger,
}

/// Everything derived from a [`BridgeConfig`] before touching the store.
#[derive(Debug, Clone)]
pub struct Plan {
    pub root: RootNamespace,
    /// Common prefix of every device entity.
    pub base: EntityPath,
    /// Entities in creation order: per device, every catalog command then `sendKey`.
    pub batch: Vec<(String, EntityDefinition)>,
    pub routes: HashMap<EntityPath, Registration>,
}

impl Plan {
    /// Derive the entity batch and the routing table.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty state path or a malformed
    /// user command.
    pub fn build(config: &BridgeConfig) -> Result<Self, ValidationError> {
        let resolved = resolve_root(&config.state_path)?;
        let catalog = CommandCatalog::new(&config.user_commands)?;
        let base = EntityPath::normalize(resolved.root, &resolved.full_path);

        let mut batch = Vec::with_capacity(config.devices.len() * (catalog.len() + 1));
        let mut routes = HashMap::with_capacity(batch.capacity());
        for device in &config.devices {
            let device_path = base.child(&device.path_segment());
            for command in catalog.iter() {
                let path = device_path.child(&command.name);
                batch.push((path.to_string(), command.definition()));
                routes.insert(
                    path,
                    Registration {
                        device: device.name.clone(),
                        trigger: Trigger::Button(command.name.clone()),
                    },
                );
            }
            let path = device_path.child(SEND_KEY);
            batch.push((path.to_string(), send_key_definition()));
            routes.insert(
                path,
                Registration {
                    device: device.name.clone(),
                    trigger: Trigger::SendKey,
                },
            );
        }

        Ok(Self {
            root: resolved.root,
            base,
            batch,
            routes,
        })
    }
}

/// Initializing phase.
pub struct Bootstrap<S, A> {
    config: BridgeConfig,
    plan: Plan,
    store: Arc<S>,
    dispatcher: Arc<CommandDispatcher<A>>,
}

impl<S, A> Bootstrap<S, A>
where
    S: EntityStore + Send + Sync + 'static,
    A: RemoteAgent + Send + Sync + 'static,
{
    /// Validate `config` and plan the entities.
    ///
    /// # Errors
    ///
    /// Returns [`WinctlError::Validation`] when the configuration is invalid.
    pub fn new(
        config: BridgeConfig,
        store: Arc<S>,
        dispatcher: Arc<CommandDispatcher<A>>,
    ) -> Result<Self, WinctlError> {
        config.validate()?;
        let plan = Plan::build(&config)?;
        Ok(Self {
            config,
            plan,
            store,
            dispatcher,
        })
    }

    #[must_use]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Provision, settle, subscribe.
    ///
    /// # Errors
    ///
    /// Returns an error when provisioning could not run at all. Individual
    /// entity failures only show up in the logged report.
    pub async fn start(self) -> Result<Listener<A>, WinctlError> {
        let Self {
            config,
            plan,
            store,
            dispatcher,
        } = self;

        let provisioner = Provisioner::new(Arc::clone(&store), config.provisioner);
        let report = provisioner
            .provision_and_wait(&plan.root.to_string(), config.force, plan.batch)
            .await?;
        log_report(&report);

        tokio::time::sleep(config.settle_delay).await;
        let receiver = store.subscribe();
        tracing::info!(base = %plan.base, routes = plan.routes.len(), "listening for entity changes");

        Ok(Listener::new(config.devices, plan.routes, receiver, dispatcher))
    }
}

fn log_report(report: &ProvisionReport) {
    if report.failed > 0 {
        tracing::warn!(
            created = report.created,
            skipped = report.skipped,
            failed = report.failed,
            "entities provisioned with failures"
        );
    } else {
        tracing::info!(
            created = report.created,
            skipped = report.skipped,
            "entities provisioned"
        );
    }
}

/// Listening phase.
pub struct Listener<A> {
    devices: Vec<Device>,
    routes: HashMap<EntityPath, Registration>,
    receiver: broadcast::Receiver<StateChange>,
    dispatcher: Arc<CommandDispatcher<A>>,
}

impl<A> Listener<A>
where
    A: RemoteAgent + Send + Sync + 'static,
{
    pub fn new(
        devices: Vec<Device>,
        routes: HashMap<EntityPath, Registration>,
        receiver: broadcast::Receiver<StateChange>,
        dispatcher: Arc<CommandDispatcher<A>>,
    ) -> Self {
        Self {
            devices,
            routes,
            receiver,
            dispatcher,
        }
    }

    /// Dispatch the command a change triggers, if any.
    ///
    /// Returns the spawned dispatch, or `None` when the change is not routed,
    /// does not fire, or names an unknown device.
    pub fn handle(&self, change: &StateChange) -> Option<JoinHandle<DispatchOutcome>> {
        let registration = self.routes.get(&change.path)?;
        let (action, command) = match &registration.trigger {
            Trigger::Button(command) => {
                if !change.value.is_true() {
                    return None;
                }
                (ActionKind::Cmd, command.clone())
            }
            Trigger::SendKey => {
                let key = change.value.to_string();
                if key.trim().is_empty() {
                    tracing::debug!(path = %change.path, "ignoring empty key");
                    return None;
                }
                (ActionKind::Key, key)
            }
        };

        let Some(host) = lookup(&self.devices, "name", &registration.device, "address") else {
            tracing::warn!(device = %registration.device, "no configuration found for device");
            return None;
        };

        let host = host.to_string();
        let device = registration.device.clone();
        let dispatcher = Arc::clone(&self.dispatcher);
        Some(tokio::spawn(async move {
            dispatcher.dispatch(&device, &host, action, &command).await
        }))
    }

    /// Handle changes until the store's change channel closes.
    pub async fn run(mut self) {
        loop {
            match self.receiver.recv().await {
                Ok(change) => {
                    self.handle(&change);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "listener lagged behind, changes were dropped");
                }
                Err(RecvError::Closed) => {
                    tracing::info!("entity store closed, listener stopping");
                    break;
                }
            }
        }
    }
}
