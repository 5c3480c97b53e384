//! Entity: a named, typed, addressable unit of state in the entity store.
//!
//! Every controlled device gets one write-only boolean "button" entity per
//! catalog command and one read-write string entity for sending raw keys.

mod value;

pub use value::{StateValue, ValueType};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::path::EntityPath;

/// Role of a push-button entity.
pub const ROLE_BUTTON: &str = "button";
/// Role of a plain state entity.
pub const ROLE_STATE: &str = "state";

/// Metadata the entity store needs to create an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Display label.
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub read: bool,
    pub write: bool,
    pub role: String,
    /// Initial value; the type's zero value when absent.
    #[serde(rename = "def", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<StateValue>,
}

impl EntityDefinition {
    /// A readable and writable entity of `value_type` with role `state`.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            read: true,
            write: true,
            role: ROLE_STATE.to_string(),
            default_value: None,
        }
    }

    /// A write-only boolean push button defaulting to `false`.
    #[must_use]
    pub fn button(name: impl Into<String>) -> Self {
        Self {
            read: false,
            role: ROLE_BUTTON.to_string(),
            default_value: Some(StateValue::Bool(false)),
            ..Self::new(name, ValueType::Boolean)
        }
    }

    /// A read-write string state defaulting to the empty string.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            default_value: Some(StateValue::String(String::new())),
            ..Self::new(name, ValueType::String)
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: StateValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// The value written right after creation.
    #[must_use]
    pub fn initial_value(&self) -> StateValue {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.value_type.zero_value())
    }

    /// Check that `value` matches the declared type of the entity at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TypeMismatch`] on a type mismatch.
    pub fn check_value(&self, path: &EntityPath, value: &StateValue) -> Result<(), ValidationError> {
        if value.value_type() == self.value_type {
            Ok(())
        } else {
            Err(ValidationError::TypeMismatch {
                path: path.to_string(),
                expected: self.value_type,
            })
        }
    }
}

/// An entity as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub path: EntityPath,
    pub definition: EntityDefinition,
    /// Current value; `None` until the first write.
    pub value: Option<StateValue>,
}
