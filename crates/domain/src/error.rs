//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`WinctlError`]
//! via `#[from]` when crossing a port boundary.

/// Top-level error returned by domain validation and port implementations.
#[derive(Debug, thiserror::Error)]
pub enum WinctlError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The requested item does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The entity store failed.
    #[error("entity store error")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("entity path must not be empty")]
    EmptyPath,

    #[error("`{0}` is not a valid root namespace (expected `0_userdata.0` or `javascript.0`..`javascript.99`)")]
    InvalidRootNamespace(String),

    #[error("device name must not be empty")]
    EmptyDeviceName,

    #[error("device `{0}` has no usable characters for an entity path")]
    UnusableDeviceName(String),

    #[error("device `{0}` has no address")]
    EmptyAddress(String),

    #[error("device `{0}` is configured more than once")]
    DuplicateDevice(String),

    #[error("`{0}` is not a valid command identifier")]
    InvalidCommand(String),

    #[error("entity `{path}` expects a {expected} value")]
    TypeMismatch {
        path: String,
        expected: crate::entity::ValueType,
    },
}

/// An item was looked up but does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Kind of item (e.g. `"Entity"`).
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}
