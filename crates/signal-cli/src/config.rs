//! Configuration loading for the signal-gatt launcher
//!
//! A single TOML file with a `[gatt]` table; every field falls back to the
//! built-in defaults, so a missing or partial file is fine.

use serde::{Deserialize, Serialize};

use signal_gatt::GattServerConfig;

use crate::error::Result;

/// Complete configuration for the launcher
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// GATT peripheral configuration
    #[serde(default)]
    pub gatt: GattServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.gatt.app_path, "/com/signal/network");
        assert_eq!(config.gatt.adapter, None);
    }

    #[test]
    fn test_partial_gatt_table() {
        let config: AppConfig = toml::from_str(
            r#"
            [gatt]
            adapter = "hci1"
            "#,
        )
        .unwrap();
        assert_eq!(config.gatt.adapter.as_deref(), Some("hci1"));
        assert_eq!(config.gatt.app_path, "/com/signal/network");
    }
}
