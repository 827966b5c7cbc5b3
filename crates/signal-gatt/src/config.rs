//! GATT server configuration

use serde::{Deserialize, Serialize};

use crate::protocol::{DEFAULT_APP_PATH, SIGNAL_POEM};

// ----------------------------------------------------------------------------
// Configuration
// ----------------------------------------------------------------------------

/// Configuration for the GATT peripheral
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GattServerConfig {
    /// Bluetooth adapter to serve on (e.g. "hci0"); first usable adapter when unset
    #[serde(default)]
    pub adapter: Option<String>,
    /// Root D-Bus object path the application tree is exported under
    #[serde(default = "default_app_path")]
    pub app_path: String,
    /// Text payload served by the beacon characteristic
    #[serde(default = "default_payload")]
    pub payload: String,
}

fn default_app_path() -> String {
    DEFAULT_APP_PATH.to_string()
}

fn default_payload() -> String {
    SIGNAL_POEM.to_string()
}

impl Default for GattServerConfig {
    fn default() -> Self {
        Self {
            adapter: None,
            app_path: default_app_path(),
            payload: default_payload(),
        }
    }
}

impl GattServerConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the adapter to serve on
    pub fn with_adapter(mut self, adapter: String) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Set the root object path
    pub fn with_app_path(mut self, app_path: String) -> Self {
        self.app_path = app_path;
        self
    }

    /// Set the payload text
    pub fn with_payload(mut self, payload: String) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GattServerConfig::default();
        assert_eq!(config.adapter, None);
        assert_eq!(config.app_path, "/com/signal/network");
        assert_eq!(config.payload, SIGNAL_POEM);
    }

    #[test]
    fn test_builder_overrides() {
        let config = GattServerConfig::new()
            .with_adapter("hci1".to_string())
            .with_app_path("/com/example/beacon".to_string())
            .with_payload("hello".to_string());
        assert_eq!(config.adapter.as_deref(), Some("hci1"));
        assert_eq!(config.app_path, "/com/example/beacon");
        assert_eq!(config.payload, "hello");
    }
}
