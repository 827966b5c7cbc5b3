//! GATT characteristic node

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use zbus::zvariant::OwnedObjectPath;

use crate::error::{GattError, Result};
use crate::protocol::GATT_CHAR_IFACE;

use super::{
    child_path, iface_name, owned, path_array, path_value, GattDescriptor, GattObject,
    InterfaceMap, OptionsMap, PropertyMap,
};

/// Produces the value served to a remote read
pub type ReadHandler = Box<dyn Fn(&OptionsMap) -> Vec<u8> + Send + Sync>;

/// Receives the value of a remote write
pub type WriteHandler = Box<dyn Fn(&[u8], &OptionsMap) + Send + Sync>;

/// The read/notify-capable leaf value of the tree, and owner of its
/// descriptors. Remote subscribe/unsubscribe actions toggle the notify
/// flag; nothing else mutates it.
pub struct GattCharacteristic {
    path: OwnedObjectPath,
    service: OwnedObjectPath,
    uuid: Uuid,
    flags: Vec<String>,
    notifying: AtomicBool,
    descriptors: Vec<Arc<GattDescriptor>>,
    on_read: ReadHandler,
    on_write: WriteHandler,
}

impl GattCharacteristic {
    pub fn new(
        service: &OwnedObjectPath,
        index: usize,
        uuid: Uuid,
        flags: &[&str],
        on_read: ReadHandler,
        on_write: WriteHandler,
    ) -> Result<Self> {
        Ok(Self {
            path: child_path(service, "char", index)?,
            service: service.clone(),
            uuid,
            flags: flags.iter().map(|f| f.to_string()).collect(),
            notifying: AtomicBool::new(false),
            descriptors: Vec::new(),
            on_read,
            on_write,
        })
    }

    /// Append a descriptor; its index is its position in insertion order.
    pub fn add_descriptor(&mut self, uuid: Uuid, flags: &[&str]) -> Result<Arc<GattDescriptor>> {
        let desc = Arc::new(GattDescriptor::new(&self.path, self.descriptors.len(), uuid, flags)?);
        self.descriptors.push(desc.clone());
        Ok(desc)
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn service_path(&self) -> &OwnedObjectPath {
        &self.service
    }

    pub fn descriptors(&self) -> &[Arc<GattDescriptor>] {
        &self.descriptors
    }

    pub fn is_notifying(&self) -> bool {
        self.notifying.load(Ordering::SeqCst)
    }

    /// Record a remote subscribe/unsubscribe. Returns whether the flag
    /// actually changed, so the caller can emit `PropertiesChanged`.
    pub fn set_notifying(&self, notifying: bool) -> bool {
        self.notifying.swap(notifying, Ordering::SeqCst) != notifying
    }

    /// Serve a remote read. Offset/MTU hints in the options are accepted but
    /// not honored; the full payload is always returned.
    pub fn read_value(&self, options: &OptionsMap) -> Vec<u8> {
        let value = (self.on_read)(options);
        info!("ReadValue called on {}", self.path);
        info!("Sending payload: {} bytes", value.len());
        value
    }

    /// Accept a remote write. Writes of any length, including empty, succeed
    /// and are handed to the write handler unvalidated; the served payload
    /// is never altered.
    pub fn write_value(&self, value: &[u8], options: &OptionsMap) {
        info!("WriteValue called on {} ({} bytes)", self.path, value.len());
        (self.on_write)(value, options);
    }

    /// Flat property map, failing with `InvalidArgs` when `interface` is not
    /// the characteristic interface.
    pub fn property_set(&self, interface: &str) -> Result<PropertyMap> {
        if interface != GATT_CHAR_IFACE {
            return Err(GattError::InvalidArgs {
                interface: interface.to_string(),
            });
        }
        let mut interfaces = self.properties()?;
        Ok(interfaces
            .remove(&iface_name(GATT_CHAR_IFACE)?)
            .unwrap_or_default())
    }
}

impl GattObject for GattCharacteristic {
    fn object_path(&self) -> &OwnedObjectPath {
        &self.path
    }

    fn properties(&self) -> Result<InterfaceMap> {
        let mut props = PropertyMap::new();
        props.insert("Service".to_string(), path_value(&self.service)?);
        props.insert("UUID".to_string(), owned(self.uuid.to_string())?);
        props.insert("Flags".to_string(), owned(self.flags.clone())?);
        props.insert("Notifying".to_string(), owned(self.is_notifying())?);
        props.insert(
            "Descriptors".to_string(),
            path_array(self.descriptors.iter().map(|d| d.object_path().clone()))?,
        );

        let mut interfaces = InterfaceMap::new();
        interfaces.insert(iface_name(GATT_CHAR_IFACE)?, props);
        Ok(interfaces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CCCD_UUID, CHAR_UUID, SIGNAL_POEM};

    fn poem_characteristic() -> GattCharacteristic {
        let service = OwnedObjectPath::try_from("/com/signal/network/service0").unwrap();
        let payload: Arc<[u8]> = SIGNAL_POEM.as_bytes().into();
        let mut chr = GattCharacteristic::new(
            &service,
            0,
            CHAR_UUID,
            &["read", "notify"],
            Box::new(move |_options| payload.to_vec()),
            Box::new(|_value, _options| {}),
        )
        .unwrap();
        chr.add_descriptor(CCCD_UUID, &["read", "write"]).unwrap();
        chr
    }

    fn junk_options() -> OptionsMap {
        let mut options = OptionsMap::new();
        options.insert("offset".to_string(), owned(4u16).unwrap());
        options.insert("mtu".to_string(), owned(23u16).unwrap());
        options.insert("unexpected".to_string(), owned("junk".to_string()).unwrap());
        options
    }

    #[test]
    fn test_read_value_returns_exact_payload_for_any_options() {
        let chr = poem_characteristic();
        assert_eq!(chr.read_value(&OptionsMap::new()), SIGNAL_POEM.as_bytes());
        // Offset and MTU hints are not honored; the full payload comes back.
        assert_eq!(chr.read_value(&junk_options()), SIGNAL_POEM.as_bytes());
        // Idempotent across calls.
        assert_eq!(chr.read_value(&OptionsMap::new()), SIGNAL_POEM.as_bytes());
    }

    #[test]
    fn test_write_value_accepts_any_length_and_leaves_payload_unchanged() {
        let chr = poem_characteristic();
        chr.write_value(&[], &OptionsMap::new());
        chr.write_value(&[0x42], &OptionsMap::new());
        chr.write_value(&vec![0xaa; 512], &junk_options());
        assert_eq!(chr.read_value(&OptionsMap::new()), SIGNAL_POEM.as_bytes());
    }

    #[test]
    fn test_reads_and_writes_never_touch_notify_state() {
        let chr = poem_characteristic();
        assert!(!chr.is_notifying());
        chr.read_value(&OptionsMap::new());
        chr.write_value(&[1, 2, 3], &OptionsMap::new());
        assert!(!chr.is_notifying());
    }

    #[test]
    fn test_notify_state_toggles_only_on_subscribe() {
        let chr = poem_characteristic();
        assert!(chr.set_notifying(true));
        assert!(chr.is_notifying());
        // Re-subscribing is a no-op.
        assert!(!chr.set_notifying(true));
        assert!(chr.set_notifying(false));
        assert!(!chr.is_notifying());
    }

    #[test]
    fn test_properties_reflect_current_notify_state() {
        let chr = poem_characteristic();
        let props = chr.property_set(GATT_CHAR_IFACE).unwrap();
        assert_eq!(props["Notifying"], owned(false).unwrap());

        chr.set_notifying(true);
        let props = chr.property_set(GATT_CHAR_IFACE).unwrap();
        assert_eq!(props["Notifying"], owned(true).unwrap());
    }

    #[test]
    fn test_descriptor_paths_follow_index_order() {
        let chr = poem_characteristic();
        let props = chr.property_set(GATT_CHAR_IFACE).unwrap();
        let expected: Vec<OwnedObjectPath> = chr
            .descriptors()
            .iter()
            .map(|d| d.object_path().clone())
            .collect();
        assert_eq!(chr.descriptors().len(), 1);
        assert_eq!(expected[0].as_str(), "/com/signal/network/service0/char0/desc0");
        assert_eq!(
            props["Descriptors"],
            path_array(expected.into_iter()).unwrap()
        );
    }

    #[test]
    fn test_property_set_rejects_foreign_interface() {
        let chr = poem_characteristic();
        let err = chr.property_set("org.bluez.GattService1").unwrap_err();
        assert!(matches!(err, GattError::InvalidArgs { .. }));
        assert_eq!(err.wire_name(), Some("org.freedesktop.DBus.Error.InvalidArgs"));
    }
}
