//! Error types for the GATT peripheral

use thiserror::Error;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Errors raised by the GATT object model and the BlueZ bridge
#[derive(Error, Debug)]
pub enum GattError {
    /// A property set was requested for an interface the object does not implement.
    /// Protocol-facing; surfaced to the calling peer, not a server fault.
    #[error("Property set requested for unimplemented interface: {interface}")]
    InvalidArgs { interface: String },

    #[error("Operation not supported")]
    NotSupported,

    /// The one-shot RegisterApplication handshake failed. Non-fatal.
    #[error("Failed to register GATT application: {0}")]
    RegistrationFailed(String),

    /// No adapter exposing a GATT manager could be found. Fatal at startup.
    #[error("No Bluetooth adapter with a GATT manager is available")]
    AdapterUnavailable,

    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    #[error("D-Bus method error: {0}")]
    Fdo(#[from] zbus::fdo::Error),

    #[error("D-Bus value error: {0}")]
    Variant(#[from] zbus::zvariant::Error),

    #[error("D-Bus name error: {0}")]
    Name(#[from] zbus::names::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for GATT operations
pub type Result<T> = std::result::Result<T, GattError>;

impl GattError {
    /// The D-Bus error name a remote peer sees for protocol-facing failures.
    pub fn wire_name(&self) -> Option<&'static str> {
        match self {
            GattError::InvalidArgs { .. } => Some("org.freedesktop.DBus.Error.InvalidArgs"),
            GattError::NotSupported => Some("org.bluez.Error.NotSupported"),
            _ => None,
        }
    }
}

impl From<GattError> for zbus::fdo::Error {
    fn from(err: GattError) -> Self {
        match err {
            GattError::InvalidArgs { .. } => zbus::fdo::Error::InvalidArgs(err.to_string()),
            GattError::NotSupported => zbus::fdo::Error::NotSupported(err.to_string()),
            GattError::Fdo(inner) => inner,
            other => zbus::fdo::Error::Failed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let err = GattError::InvalidArgs {
            interface: "org.bluez.Battery1".to_string(),
        };
        assert_eq!(err.wire_name(), Some("org.freedesktop.DBus.Error.InvalidArgs"));
        assert_eq!(GattError::NotSupported.wire_name(), Some("org.bluez.Error.NotSupported"));
        assert_eq!(GattError::AdapterUnavailable.wire_name(), None);
    }

    #[test]
    fn test_invalid_args_maps_to_fdo_invalid_args() {
        let err = GattError::InvalidArgs {
            interface: "org.bluez.Battery1".to_string(),
        };
        let fdo: zbus::fdo::Error = err.into();
        assert!(matches!(fdo, zbus::fdo::Error::InvalidArgs(_)));
    }

    #[test]
    fn test_registration_failure_maps_to_generic_failure() {
        let fdo: zbus::fdo::Error = GattError::RegistrationFailed("rejected".to_string()).into();
        assert!(matches!(fdo, zbus::fdo::Error::Failed(_)));
    }
}
