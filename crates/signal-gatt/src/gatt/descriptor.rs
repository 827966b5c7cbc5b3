//! GATT descriptor node

use uuid::Uuid;
use zbus::zvariant::OwnedObjectPath;

use crate::error::Result;
use crate::protocol::GATT_DESC_IFACE;

use super::{child_path, iface_name, owned, path_value, GattObject, InterfaceMap, PropertyMap};

/// Static metadata attached to a characteristic, e.g. the client
/// characteristic configuration point. Descriptors carry no value handlers;
/// notify toggles arrive through the owning characteristic.
pub struct GattDescriptor {
    path: OwnedObjectPath,
    // Back-reference to the owning characteristic, non-owning
    characteristic: OwnedObjectPath,
    uuid: Uuid,
    flags: Vec<String>,
}

impl GattDescriptor {
    pub(crate) fn new(
        characteristic: &OwnedObjectPath,
        index: usize,
        uuid: Uuid,
        flags: &[&str],
    ) -> Result<Self> {
        Ok(Self {
            path: child_path(characteristic, "desc", index)?,
            characteristic: characteristic.clone(),
            uuid,
            flags: flags.iter().map(|f| f.to_string()).collect(),
        })
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn characteristic_path(&self) -> &OwnedObjectPath {
        &self.characteristic
    }
}

impl GattObject for GattDescriptor {
    fn object_path(&self) -> &OwnedObjectPath {
        &self.path
    }

    fn properties(&self) -> Result<InterfaceMap> {
        let mut props = PropertyMap::new();
        props.insert("Characteristic".to_string(), path_value(&self.characteristic)?);
        props.insert("UUID".to_string(), owned(self.uuid.to_string())?);
        props.insert("Flags".to_string(), owned(self.flags.clone())?);

        let mut interfaces = InterfaceMap::new();
        interfaces.insert(iface_name(GATT_DESC_IFACE)?, props);
        Ok(interfaces)
    }
}
