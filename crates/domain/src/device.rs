//! Device: a controlled PC running the remote-control agent.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::lookup::ConfigRecord;
use crate::text::sanitize_for_path;

/// A controlled host, identified by its human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Display name; also the source of the entity path segment.
    pub name: String,
    /// Network host of the agent (IP address or hostname).
    #[serde(alias = "ip")]
    pub address: String,
}

impl Device {
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// The sanitized name used as this device's entity path segment.
    #[must_use]
    pub fn path_segment(&self) -> String {
        sanitize_for_path(&self.name)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the name is empty or has no path
    /// characters, or when the address is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceName);
        }
        if self.path_segment().is_empty() {
            return Err(ValidationError::UnusableDeviceName(self.name.clone()));
        }
        if self.address.trim().is_empty() {
            return Err(ValidationError::EmptyAddress(self.name.clone()));
        }
        Ok(())
    }
}

impl ConfigRecord for Device {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(&self.name),
            "address" | "ip" => Some(&self.address),
            _ => None,
        }
    }
}

/// Validate a device list: every device valid, names and path segments unique.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_devices(devices: &[Device]) -> Result<(), ValidationError> {
    let mut names = HashSet::new();
    let mut segments = HashSet::new();
    for device in devices {
        device.validate()?;
        if !names.insert(device.name.as_str()) || !segments.insert(device.path_segment()) {
            return Err(ValidationError::DuplicateDevice(device.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::lookup;

    fn devices() -> Vec<Device> {
        vec![
            Device::new("PC-John", "192.168.0.101"),
            Device::new("Gästezimmer-PC", "10.10.0.102"),
        ]
    }

    #[test]
    fn should_resolve_address_by_name() {
        let devices = devices();
        assert_eq!(
            lookup(&devices, "name", "PC-John", "address"),
            Some("192.168.0.101")
        );
        assert_eq!(lookup(&devices, "name", "Gästezimmer-PC", "ip"), Some("10.10.0.102"));
    }

    #[test]
    fn should_return_none_for_unknown_device() {
        assert_eq!(lookup(&devices(), "name", "unknown", "address"), None);
    }

    #[test]
    fn should_return_none_for_unknown_field() {
        assert_eq!(lookup(&devices(), "name", "PC-John", "mac"), None);
    }

    #[test]
    fn should_sanitize_path_segment() {
        let device = Device::new("Büro PC!", "10.0.0.1");
        assert_eq!(device.path_segment(), "BüroPC");
    }

    #[test]
    fn should_reject_empty_name() {
        let device = Device::new("  ", "10.0.0.1");
        assert_eq!(device.validate(), Err(ValidationError::EmptyDeviceName));
    }

    #[test]
    fn should_reject_name_without_path_characters() {
        let device = Device::new("!!!", "10.0.0.1");
        assert_eq!(
            device.validate(),
            Err(ValidationError::UnusableDeviceName("!!!".to_string()))
        );
    }

    #[test]
    fn should_reject_empty_address() {
        let device = Device::new("PC-John", "");
        assert_eq!(
            device.validate(),
            Err(ValidationError::EmptyAddress("PC-John".to_string()))
        );
    }

    #[test]
    fn should_reject_devices_sharing_a_path_segment() {
        let devices = vec![
            Device::new("PC John", "10.0.0.1"),
            Device::new("PC-John", "10.0.0.2"),
            Device::new("PCJohn!", "10.0.0.3"),
        ];
        assert_eq!(
            validate_devices(&devices),
            Err(ValidationError::DuplicateDevice("PCJohn!".to_string()))
        );
    }

    #[test]
    fn should_accept_distinct_devices() {
        assert!(validate_devices(&devices()).is_ok());
    }

    #[test]
    fn should_deserialize_legacy_ip_field() {
        let device: Device =
            serde_json::from_str(r#"{"name": "PC-John", "ip": "192.168.0.101"}"#).unwrap();
        assert_eq!(device.address, "192.168.0.101");
    }
}
