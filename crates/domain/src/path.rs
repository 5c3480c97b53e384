//! Entity paths and the root namespaces they live under.
//!
//! The entity store accepts user-visible entities under two roots: the
//! shared user-data area `0_userdata.0` and a script instance area
//! `javascript.<N>` (N in 0–99). Operator-supplied paths may use either
//! form, or omit the root entirely.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const USERDATA_ROOT: &str = "0_userdata.0";
const SCRIPT_ADAPTER: &str = "javascript";
const MAX_SCRIPT_INSTANCE: u8 = 99;

/// Top-level storage area of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RootNamespace {
    /// `0_userdata.0`
    #[default]
    UserData,
    /// `javascript.<instance>`
    Script(u8),
}

impl fmt::Display for RootNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserData => f.write_str(USERDATA_ROOT),
            Self::Script(instance) => write!(f, "{SCRIPT_ADAPTER}.{instance}"),
        }
    }
}

impl FromStr for RootNamespace {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == USERDATA_ROOT {
            return Ok(Self::UserData);
        }
        s.split_once('.')
            .filter(|(adapter, _)| *adapter == SCRIPT_ADAPTER)
            .and_then(|(_, instance)| parse_instance(instance))
            .map(Self::Script)
            .ok_or_else(|| ValidationError::InvalidRootNamespace(s.to_string()))
    }
}

impl RootNamespace {
    /// Whether `path` is this root or lies below it, segment-wise.
    fn is_prefix_of(self, path: &str) -> bool {
        let root = self.to_string();
        path.strip_prefix(&root)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }
}

/// One or two digits without a leading zero, at most [`MAX_SCRIPT_INSTANCE`].
fn parse_instance(raw: &str) -> Option<u8> {
    let well_formed = matches!(raw.len(), 1 | 2)
        && raw.bytes().all(|b| b.is_ascii_digit())
        && !(raw.len() == 2 && raw.starts_with('0'));
    if !well_formed {
        return None;
    }
    raw.parse().ok().filter(|n| *n <= MAX_SCRIPT_INSTANCE)
}

/// The root namespace a path begins with, if it begins with one followed by
/// at least one more segment.
fn match_prefix(path: &str) -> Option<RootNamespace> {
    let mut parts = path.splitn(3, '.');
    let adapter = parts.next()?;
    let instance = parts.next()?;
    parts.next()?;
    format!("{adapter}.{instance}").parse().ok()
}

/// A path together with the root namespace it was resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub root: RootNamespace,
    pub full_path: String,
}

/// Resolve the root namespace of an operator-supplied dotted path.
///
/// One leading and one trailing dot are trimmed. Paths that do not start
/// with a recognised root are placed under `0_userdata.0`.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyPath`] when nothing is left after trimming.
pub fn resolve_root(path: &str) -> Result<ResolvedPath, ValidationError> {
    let trimmed = path.strip_prefix('.').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPath);
    }

    let root = match_prefix(trimmed).unwrap_or_default();
    let full_path = if root.is_prefix_of(trimmed) {
        trimmed.to_string()
    } else {
        format!("{root}.{trimmed}")
    };
    Ok(ResolvedPath { root, full_path })
}

/// Fully qualified, dot-separated entity path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityPath(String);

impl EntityPath {
    /// Place `raw` under `root` (unless it already starts with it) and
    /// collapse runs of dots.
    #[must_use]
    pub fn normalize(root: RootNamespace, raw: &str) -> Self {
        let joined = if root.is_prefix_of(raw) {
            raw.to_string()
        } else {
            format!("{root}.{raw}")
        };
        Self(collapse_dots(&joined))
    }

    /// Append a segment.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self(collapse_dots(&format!("{}.{segment}", self.0)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntityPath {
    fn from(raw: String) -> Self {
        Self(collapse_dots(&raw))
    }
}

impl From<&str> for EntityPath {
    fn from(raw: &str) -> Self {
        Self(collapse_dots(raw))
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn collapse_dots(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '.' && out.ends_with('.') {
            continue;
        }
        out.push(c);
    }
    out
}
