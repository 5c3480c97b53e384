//! Key/value lookups across lists of configuration records.

use std::collections::BTreeMap;

/// A configuration record whose fields can be read by name.
pub trait ConfigRecord {
    /// The value of `key`, or `None` when the record has no such field.
    fn field(&self, key: &str) -> Option<&str>;
}

impl ConfigRecord for BTreeMap<String, String> {
    fn field(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Return `return_key` of the first record whose `match_key` equals `match_value`.
///
/// Scans in order and stops at the first match. `None` means either that no
/// record matched or that the matching record lacks `return_key`; callers
/// treat both the same way.
///
/// ```
/// use winctl_domain::device::Device;
/// use winctl_domain::lookup::lookup;
///
/// let devices = vec![Device::new("PC-John", "192.168.0.101")];
/// assert_eq!(lookup(&devices, "name", "PC-John", "address"), Some("192.168.0.101"));
/// assert_eq!(lookup(&devices, "name", "unknown", "address"), None);
/// ```
pub fn lookup<'a, R: ConfigRecord>(
    records: &'a [R],
    match_key: &str,
    match_value: &str,
    return_key: &str,
) -> Option<&'a str> {
    records
        .iter()
        .find(|record| record.field(match_key) == Some(match_value))
        .and_then(|record| record.field(return_key))
}
