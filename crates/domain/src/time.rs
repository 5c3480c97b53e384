//! Timestamps attached to state changes.

use chrono::{DateTime, Utc};

/// UTC timestamp of a state change.
pub type Timestamp = DateTime<Utc>;

/// Current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}
