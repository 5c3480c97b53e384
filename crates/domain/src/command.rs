//! Command catalog and agent requests.
//!
//! The remote-control agent understands a fixed set of built-in commands.
//! Operators can register more in the agent's command list; those are
//! configured here as user commands. Every catalog command becomes a button
//! entity per device.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityDefinition;
use crate::error::ValidationError;
use crate::text::{compact, is_emptyish};

/// Commands every agent supports.
pub const BUILTIN_COMMANDS: [&str; 8] = [
    "process",
    "shutdown",
    "poweroff",
    "reboot",
    "forceifhung",
    "logoff",
    "monitor1",
    "monitor2",
];

/// Leaf name of the per-device free-text key entity.
pub const SEND_KEY: &str = "sendKey";

/// Query parameter the agent dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Run a command from the agent's command list.
    Cmd,
    /// Send a key stroke.
    Key,
}

impl ActionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cmd => "cmd",
            Self::Key => "key",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request for the remote agent on `host`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub host: String,
    pub action: ActionKind,
    pub command: String,
}

/// Where a catalog command comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOrigin {
    BuiltIn,
    User,
}

/// A command exposed as a button entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCommand {
    pub name: String,
    pub origin: CommandOrigin,
}

impl CatalogCommand {
    /// Definition of the button entity for this command.
    #[must_use]
    pub fn definition(&self) -> EntityDefinition {
        let label = match self.origin {
            CommandOrigin::BuiltIn => format!("Command: {}", self.name),
            CommandOrigin::User => format!("User Command: {}", self.name),
        };
        EntityDefinition::button(label)
    }
}

/// Definition of the per-device free-text key entity.
#[must_use]
pub fn send_key_definition() -> EntityDefinition {
    EntityDefinition::text("Send Key")
}

/// Check a user command identifier: ASCII letters, digits, `_` and `-` only.
///
/// [`SEND_KEY`] names the free-text entity and is never a command.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCommand`] for empty, malformed or
/// reserved ids.
pub fn validate_command_id(id: &str) -> Result<(), ValidationError> {
    let valid = !id.is_empty()
        && id != SEND_KEY
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidCommand(id.to_string()))
    }
}

/// Built-in commands merged with the operator's commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCatalog {
    commands: Vec<CatalogCommand>,
}

impl CommandCatalog {
    /// Merge the built-ins with `user_commands`.
    ///
    /// Empty entries are placeholders and are dropped; a user command that
    /// repeats an earlier one is dropped too.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCommand`] for a malformed user command.
    pub fn new<S: AsRef<str>>(user_commands: &[S]) -> Result<Self, ValidationError> {
        let mut commands: Vec<CatalogCommand> = BUILTIN_COMMANDS
            .iter()
            .map(|name| CatalogCommand {
                name: (*name).to_string(),
                origin: CommandOrigin::BuiltIn,
            })
            .collect();

        let own: Vec<&str> = user_commands.iter().map(AsRef::as_ref).collect();
        if is_emptyish(Some(&serde_json::Value::from(own.clone()))) {
            return Ok(Self { commands });
        }

        for name in compact(own) {
            validate_command_id(name)?;
            if commands.iter().any(|known| known.name == name) {
                continue;
            }
            commands.push(CatalogCommand {
                name: name.to_string(),
                origin: CommandOrigin::User,
            });
        }
        Ok(Self { commands })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogCommand> {
        self.commands.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::new::<&str>(&[]).unwrap_or_else(|_| Self {
            commands: Vec::new(),
        })
    }
}
