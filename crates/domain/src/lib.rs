//! # winctl-domain
//!
//! Pure domain model for the winctl remote-control bridge.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Devices** (controlled PCs, identified by name, reached by address)
//! - Define the **Command Catalog** (agent built-ins plus operator commands)
//! - Define **Entity Paths** and their root namespaces
//! - Define **Entity Definitions** and typed **State Values**
//! - Define **State Changes** (notifications emitted by the entity store)
//! - Small pure helpers: path sanitization, emptiness tests, config lookups
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod command;
pub mod device;
pub mod entity;
pub mod event;
pub mod lookup;
pub mod path;
pub mod text;
