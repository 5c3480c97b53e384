//! State change: the notification the entity store emits on every write.

use serde::{Deserialize, Serialize};

use crate::entity::StateValue;
use crate::path::EntityPath;
use crate::time::{Timestamp, now};

/// A value was written to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    pub path: EntityPath,
    pub value: StateValue,
    /// `true` when the write confirms a value (as opposed to a command).
    pub ack: bool,
    pub timestamp: Timestamp,
}

impl StateChange {
    /// Create a change stamped with the current time.
    #[must_use]
    pub fn new(path: EntityPath, value: StateValue, ack: bool) -> Self {
        Self {
            path,
            value,
            ack,
            timestamp: now(),
        }
    }
}
