//! GATT service node

use std::sync::Arc;

use uuid::Uuid;
use zbus::zvariant::OwnedObjectPath;

use crate::error::{GattError, Result};
use crate::protocol::GATT_SERVICE_IFACE;

use super::{
    child_path, iface_name, owned, path_array, GattCharacteristic, GattObject, InterfaceMap,
    ManagedObjects, PropertyMap,
};

/// One primary GATT service owning an ordered set of characteristics.
pub struct GattService {
    path: OwnedObjectPath,
    uuid: Uuid,
    primary: bool,
    characteristics: Vec<Arc<GattCharacteristic>>,
}

impl GattService {
    pub fn new(app_path: &OwnedObjectPath, index: usize, uuid: Uuid, primary: bool) -> Result<Self> {
        Ok(Self {
            path: child_path(app_path, "service", index)?,
            uuid,
            primary,
            characteristics: Vec::new(),
        })
    }

    /// Append a characteristic; insertion order is the exposed order.
    pub fn add_characteristic(&mut self, characteristic: GattCharacteristic) -> Arc<GattCharacteristic> {
        let characteristic = Arc::new(characteristic);
        self.characteristics.push(characteristic.clone());
        characteristic
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn primary(&self) -> bool {
        self.primary
    }

    pub fn characteristics(&self) -> &[Arc<GattCharacteristic>] {
        &self.characteristics
    }

    /// Flat property map, failing with `InvalidArgs` when `interface` is not
    /// the service interface.
    pub fn property_set(&self, interface: &str) -> Result<PropertyMap> {
        if interface != GATT_SERVICE_IFACE {
            return Err(GattError::InvalidArgs {
                interface: interface.to_string(),
            });
        }
        let mut interfaces = self.properties()?;
        Ok(interfaces
            .remove(&iface_name(GATT_SERVICE_IFACE)?)
            .unwrap_or_default())
    }

    /// Every owned characteristic and descriptor with its property maps,
    /// keyed by path. Used by the application during discovery.
    pub fn collect_descendants(&self) -> Result<ManagedObjects> {
        let mut objects = ManagedObjects::new();
        for characteristic in &self.characteristics {
            objects.insert(characteristic.object_path().clone(), characteristic.properties()?);
            for descriptor in characteristic.descriptors() {
                objects.insert(descriptor.object_path().clone(), descriptor.properties()?);
            }
        }
        Ok(objects)
    }
}

impl GattObject for GattService {
    fn object_path(&self) -> &OwnedObjectPath {
        &self.path
    }

    fn properties(&self) -> Result<InterfaceMap> {
        let mut props = PropertyMap::new();
        props.insert("UUID".to_string(), owned(self.uuid.to_string())?);
        props.insert("Primary".to_string(), owned(self.primary)?);
        props.insert(
            "Characteristics".to_string(),
            path_array(self.characteristics.iter().map(|c| c.object_path().clone()))?,
        );

        let mut interfaces = InterfaceMap::new();
        interfaces.insert(iface_name(GATT_SERVICE_IFACE)?, props);
        Ok(interfaces)
    }
}
