//! D-Bus exposition of the GATT object tree
//!
//! Thin zbus shims that put the object model on the bus: the application
//! root answers the `ObjectManager` discovery query by delegating to the
//! model, and each service/characteristic/descriptor node exposes its
//! properties and value methods at its model-derived path. zbus's standard
//! properties machinery serves the per-interface `GetAll` calls.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};
use zbus::object_server::SignalEmitter;
use zbus::zvariant::{OwnedObjectPath, OwnedValue};
use zbus::{fdo, interface, proxy, Connection};

use crate::error::{GattError, Result};
use crate::gatt::{
    GattApplication, GattCharacteristic, GattDescriptor, GattObject, GattService, ManagedObjects,
    OptionsMap,
};
use crate::protocol::{ADAPTER_IFACE, BLUEZ_BUS_NAME, GATT_MANAGER_IFACE};

// ----------------------------------------------------------------------------
// BlueZ proxies
// ----------------------------------------------------------------------------

/// Proxy for `org.bluez.GattManager1` on an adapter object.
#[proxy(
    interface = "org.bluez.GattManager1",
    default_service = "org.bluez",
    gen_blocking = false
)]
pub trait GattManager {
    /// RegisterApplication method
    fn register_application(
        &self,
        application: &OwnedObjectPath,
        options: HashMap<String, OwnedValue>,
    ) -> zbus::Result<()>;

    /// UnregisterApplication method
    fn unregister_application(&self, application: &OwnedObjectPath) -> zbus::Result<()>;
}

/// Locate the adapter object to serve on: the first object under `org.bluez`
/// exposing both the adapter and GATT manager interfaces, restricted to
/// `adapter_name` (e.g. "hci0") when one is configured.
pub async fn find_adapter(conn: &Connection, adapter_name: Option<&str>) -> Result<OwnedObjectPath> {
    let om = fdo::ObjectManagerProxy::builder(conn)
        .destination(BLUEZ_BUS_NAME)?
        .path("/")?
        .build()
        .await?;
    let objects = om.get_managed_objects().await?;

    objects
        .into_iter()
        .find(|(path, interfaces)| {
            let has_gatt = interfaces.keys().any(|i| i.as_str() == GATT_MANAGER_IFACE);
            let has_adapter = interfaces.keys().any(|i| i.as_str() == ADAPTER_IFACE);
            if !(has_gatt && has_adapter) {
                return false;
            }
            adapter_name
                .map(|name| path.as_str().rsplit('/').next() == Some(name))
                .unwrap_or(true)
        })
        .map(|(path, _)| path)
        .ok_or(GattError::AdapterUnavailable)
}

// ----------------------------------------------------------------------------
// Exported objects
// ----------------------------------------------------------------------------

/// Root object answering the global discovery query.
pub(crate) struct ApplicationObject {
    app: Arc<GattApplication>,
}

#[interface(name = "org.freedesktop.DBus.ObjectManager")]
impl ApplicationObject {
    fn get_managed_objects(&self) -> fdo::Result<ManagedObjects> {
        debug!("GetManagedObjects called on {}", self.app.object_path());
        self.app.managed_objects().map_err(Into::into)
    }
}

pub(crate) struct ServiceObject {
    service: Arc<GattService>,
}

#[interface(name = "org.bluez.GattService1")]
impl ServiceObject {
    #[zbus(property, name = "UUID")]
    fn uuid(&self) -> String {
        self.service.uuid().to_string()
    }

    #[zbus(property)]
    fn primary(&self) -> bool {
        self.service.primary()
    }

    #[zbus(property)]
    fn characteristics(&self) -> Vec<OwnedObjectPath> {
        self.service
            .characteristics()
            .iter()
            .map(|c| c.object_path().clone())
            .collect()
    }
}

pub(crate) struct CharacteristicObject {
    characteristic: Arc<GattCharacteristic>,
}

impl CharacteristicObject {
    /// Fire-and-forget `PropertiesChanged` for the notify flag; delivery is
    /// only ever queued on the dispatch loop, so failures are not surfaced.
    async fn emit_notifying_changed(&self, emitter: &SignalEmitter<'_>) {
        if let Err(err) = self.notifying_changed(emitter).await {
            debug!("PropertiesChanged emission failed: {}", err);
        }
    }
}

#[interface(name = "org.bluez.GattCharacteristic1")]
impl CharacteristicObject {
    #[zbus(property)]
    fn service(&self) -> OwnedObjectPath {
        self.characteristic.service_path().clone()
    }

    #[zbus(property, name = "UUID")]
    fn uuid(&self) -> String {
        self.characteristic.uuid().to_string()
    }

    #[zbus(property)]
    fn flags(&self) -> Vec<String> {
        self.characteristic.flags().to_vec()
    }

    #[zbus(property)]
    fn notifying(&self) -> bool {
        self.characteristic.is_notifying()
    }

    #[zbus(property)]
    fn descriptors(&self) -> Vec<OwnedObjectPath> {
        self.characteristic
            .descriptors()
            .iter()
            .map(|d| d.object_path().clone())
            .collect()
    }

    fn read_value(&self, options: OptionsMap) -> fdo::Result<Vec<u8>> {
        Ok(self.characteristic.read_value(&options))
    }

    fn write_value(&self, value: Vec<u8>, options: OptionsMap) -> fdo::Result<()> {
        self.characteristic.write_value(&value, &options);
        Ok(())
    }

    async fn start_notify(
        &self,
        #[zbus(signal_emitter)] emitter: SignalEmitter<'_>,
    ) -> fdo::Result<()> {
        if self.characteristic.set_notifying(true) {
            info!("Notifications enabled on {}", self.characteristic.object_path());
            self.emit_notifying_changed(&emitter).await;
        }
        Ok(())
    }

    async fn stop_notify(
        &self,
        #[zbus(signal_emitter)] emitter: SignalEmitter<'_>,
    ) -> fdo::Result<()> {
        if self.characteristic.set_notifying(false) {
            info!("Notifications disabled on {}", self.characteristic.object_path());
            self.emit_notifying_changed(&emitter).await;
        }
        Ok(())
    }
}

pub(crate) struct DescriptorObject {
    descriptor: Arc<GattDescriptor>,
}

#[interface(name = "org.bluez.GattDescriptor1")]
impl DescriptorObject {
    #[zbus(property)]
    fn characteristic(&self) -> OwnedObjectPath {
        self.descriptor.characteristic_path().clone()
    }

    #[zbus(property, name = "UUID")]
    fn uuid(&self) -> String {
        self.descriptor.uuid().to_string()
    }

    #[zbus(property)]
    fn flags(&self) -> Vec<String> {
        self.descriptor.flags().to_vec()
    }
}

// ----------------------------------------------------------------------------
// Tree export
// ----------------------------------------------------------------------------

/// Register the whole tree on the connection's object server, each node at
/// its model-derived path.
pub(crate) async fn export_tree(conn: &Connection, app: &Arc<GattApplication>) -> Result<()> {
    let server = conn.object_server();

    server
        .at(app.object_path(), ApplicationObject { app: app.clone() })
        .await?;

    for service in app.services() {
        server
            .at(service.object_path(), ServiceObject { service: service.clone() })
            .await?;
        for characteristic in service.characteristics() {
            server
                .at(
                    characteristic.object_path(),
                    CharacteristicObject {
                        characteristic: characteristic.clone(),
                    },
                )
                .await?;
            for descriptor in characteristic.descriptors() {
                server
                    .at(
                        descriptor.object_path(),
                        DescriptorObject {
                            descriptor: descriptor.clone(),
                        },
                    )
                    .await?;
            }
        }
    }

    info!("Exported GATT object tree at {}", app.object_path());
    Ok(())
}
