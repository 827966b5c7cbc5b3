//! GATT protocol constants for the signal-network peripheral

use uuid::Uuid;

// ----------------------------------------------------------------------------
// Service, Characteristic and Descriptor UUIDs
// ----------------------------------------------------------------------------

/// Signal-network beacon service UUID
pub const SERVICE_UUID: Uuid = Uuid::from_u128(0x12345678_1234_5678_1234_56789abcdef0);

/// Beacon characteristic UUID (read/notify)
pub const CHAR_UUID: Uuid = Uuid::from_u128(0x12345679_1234_5678_1234_56789abcdef0);

/// Client Characteristic Configuration Descriptor UUID (Bluetooth SIG assigned)
pub const CCCD_UUID: Uuid = Uuid::from_u128(0x00002902_0000_1000_8000_00805f9b34fb);

// ----------------------------------------------------------------------------
// D-Bus interface names
// ----------------------------------------------------------------------------

pub const GATT_SERVICE_IFACE: &str = "org.bluez.GattService1";
pub const GATT_CHAR_IFACE: &str = "org.bluez.GattCharacteristic1";
pub const GATT_DESC_IFACE: &str = "org.bluez.GattDescriptor1";
pub const GATT_MANAGER_IFACE: &str = "org.bluez.GattManager1";
pub const ADAPTER_IFACE: &str = "org.bluez.Adapter1";

pub const INTROSPECTABLE_IFACE: &str = "org.freedesktop.DBus.Introspectable";
pub const PROPERTIES_IFACE: &str = "org.freedesktop.DBus.Properties";
pub const OBJECT_MANAGER_IFACE: &str = "org.freedesktop.DBus.ObjectManager";

/// Well-known bus name of the BlueZ daemon
pub const BLUEZ_BUS_NAME: &str = "org.bluez";

// ----------------------------------------------------------------------------
// Defaults
// ----------------------------------------------------------------------------

/// Root object path the GATT application is exported under
pub const DEFAULT_APP_PATH: &str = "/com/signal/network";

/// The text served by the beacon characteristic
pub const SIGNAL_POEM: &str =
    "Do you see it too?\n\nA signal in the darkness,\nwaiting to be found.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_strings_are_canonical() {
        assert_eq!(SERVICE_UUID.to_string(), "12345678-1234-5678-1234-56789abcdef0");
        assert_eq!(CHAR_UUID.to_string(), "12345679-1234-5678-1234-56789abcdef0");
        assert_eq!(CCCD_UUID.to_string(), "00002902-0000-1000-8000-00805f9b34fb");
    }

    #[test]
    fn test_poem_has_no_trailing_terminator() {
        assert!(!SIGNAL_POEM.ends_with('\0'));
        assert!(!SIGNAL_POEM.ends_with('\n'));
        assert_eq!(SIGNAL_POEM.len(), 66);
    }
}
