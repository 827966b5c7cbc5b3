//! GATT application root

use std::sync::Arc;

use zbus::zvariant::OwnedObjectPath;

use crate::error::Result;
use crate::protocol::{INTROSPECTABLE_IFACE, OBJECT_MANAGER_IFACE, PROPERTIES_IFACE};

use super::{iface_name, GattObject, GattService, InterfaceMap, ManagedObjects, PropertyMap};

/// Root container of the object tree; the single source of truth for the
/// global discovery query.
pub struct GattApplication {
    path: OwnedObjectPath,
    services: Vec<Arc<GattService>>,
}

impl GattApplication {
    pub fn new(path: &str) -> Result<Self> {
        Ok(Self {
            path: OwnedObjectPath::try_from(path.to_string())?,
            services: Vec::new(),
        })
    }

    /// Append a service; insertion order is the exposed order.
    pub fn add_service(&mut self, service: GattService) -> Arc<GattService> {
        let service = Arc::new(service);
        self.services.push(service.clone());
        service
    }

    pub fn object_path(&self) -> &OwnedObjectPath {
        &self.path
    }

    pub fn services(&self) -> &[Arc<GattService>] {
        &self.services
    }

    /// Answer the global discovery query: every object in the tree with its
    /// full property maps. The root path always carries the three standard
    /// introspection interfaces as empty property maps so management tooling
    /// recognizes it as a container. Pure read; reflects the notify flags at
    /// call time.
    pub fn managed_objects(&self) -> Result<ManagedObjects> {
        let mut objects = ManagedObjects::new();

        let mut root = InterfaceMap::new();
        for interface in [INTROSPECTABLE_IFACE, PROPERTIES_IFACE, OBJECT_MANAGER_IFACE] {
            root.insert(iface_name(interface)?, PropertyMap::new());
        }
        objects.insert(self.path.clone(), root);

        for service in &self.services {
            objects.insert(service.object_path().clone(), service.properties()?);
            objects.extend(service.collect_descendants()?);
        }
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gatt::GattCharacteristic;
    use crate::protocol::{CCCD_UUID, CHAR_UUID, SERVICE_UUID};

    fn signal_application() -> GattApplication {
        let mut app = GattApplication::new("/com/signal/network").unwrap();
        let mut service = GattService::new(app.object_path(), 0, SERVICE_UUID, true).unwrap();
        let mut chr = GattCharacteristic::new(
            service.object_path(),
            0,
            CHAR_UUID,
            &["read", "notify"],
            Box::new(|_options| b"payload".to_vec()),
            Box::new(|_value, _options| {}),
        )
        .unwrap();
        chr.add_descriptor(CCCD_UUID, &["read", "write"]).unwrap();
        service.add_characteristic(chr);
        app.add_service(service);
        app
    }

    #[test]
    fn test_root_carries_empty_introspection_interfaces_even_without_services() {
        let app = GattApplication::new("/com/signal/network").unwrap();
        let objects = app.managed_objects().unwrap();
        assert_eq!(objects.len(), 1);

        let root = &objects[app.object_path()];
        assert_eq!(root.len(), 3);
        for interface in [INTROSPECTABLE_IFACE, PROPERTIES_IFACE, OBJECT_MANAGER_IFACE] {
            assert!(root[&iface_name(interface).unwrap()].is_empty());
        }
    }

    #[test]
    fn test_discovery_covers_the_whole_tree() {
        let app = signal_application();
        let objects = app.managed_objects().unwrap();

        // Root + service + characteristic + descriptor.
        assert_eq!(objects.len(), 4);
        for path in [
            "/com/signal/network",
            "/com/signal/network/service0",
            "/com/signal/network/service0/char0",
            "/com/signal/network/service0/char0/desc0",
        ] {
            let path = OwnedObjectPath::try_from(path).unwrap();
            assert!(objects.contains_key(&path), "missing {}", path);
        }
    }

    #[test]
    fn test_paths_form_a_strict_tree() {
        let app = signal_application();
        let objects = app.managed_objects().unwrap();

        let root = app.object_path().as_str();
        for path in objects.keys() {
            assert!(path.as_str().starts_with(root));
        }
        // No path is reused by two distinct entities: HashMap keys are
        // unique by construction, so it suffices that all inserts landed.
        assert_eq!(objects.len(), 4);
    }
}
