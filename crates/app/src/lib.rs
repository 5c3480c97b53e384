//! # winctl-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `EntityStore`: create, read, write and watch entities
//!   - `RemoteAgent`: send one command to a remote-control agent
//! - Provide the use-cases:
//!   - `Provisioner`: idempotent batch creation with exactly-once completion
//!   - `CommandDispatcher`: send a command and classify the outcome
//!   - `Bootstrap` / `Listener`: provision device entities, then route their
//!     changes to the dispatcher
//! - Orchestrate domain objects without knowing *how* storage or HTTP works
//!
//! ## Dependency rule
//! Depends on `winctl-domain` only (plus `tokio` for tasks, channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod bootstrap;
pub mod dispatcher;
pub mod ports;
pub mod provisioner;
