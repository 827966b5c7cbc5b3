//! GATT object model
//!
//! The typed tree of objects the peripheral exposes to BlueZ:
//! application → service → characteristic → descriptor. The tree is built
//! once at startup and is structurally immutable afterwards; the only
//! mutable runtime state is each characteristic's notify flag.
//!
//! Object paths derive deterministically from the parent path plus a kind
//! and index (`/service0`, `/char0`, `/desc0`), so children's paths are
//! always proper extensions of their parent's path.

mod application;
mod characteristic;
mod descriptor;
mod service;

pub use application::GattApplication;
pub use characteristic::{GattCharacteristic, ReadHandler, WriteHandler};
pub use descriptor::GattDescriptor;
pub use service::GattService;

use std::collections::HashMap;

use zbus::names::OwnedInterfaceName;
use zbus::zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::error::Result;

// ----------------------------------------------------------------------------
// Property map types
// ----------------------------------------------------------------------------

/// Flat property-name → value map for a single interface
pub type PropertyMap = HashMap<String, OwnedValue>;

/// Interface → properties map for a single object
pub type InterfaceMap = HashMap<OwnedInterfaceName, PropertyMap>;

/// Path → interfaces map; the shape of a `GetManagedObjects` reply
pub type ManagedObjects = HashMap<OwnedObjectPath, InterfaceMap>;

/// Option dictionary passed with `ReadValue`/`WriteValue` calls
pub type OptionsMap = HashMap<String, OwnedValue>;

// ----------------------------------------------------------------------------
// Shared object capability
// ----------------------------------------------------------------------------

/// Capability shared by every node exposed on the bus.
pub trait GattObject {
    /// D-Bus object path of this node
    fn object_path(&self) -> &OwnedObjectPath;

    /// Full interface → property map for this node
    fn properties(&self) -> Result<InterfaceMap>;
}

// ----------------------------------------------------------------------------
// Value construction helpers
// ----------------------------------------------------------------------------

pub(crate) fn owned<'a>(value: impl Into<Value<'a>>) -> Result<OwnedValue> {
    Ok(value.into().try_to_owned()?)
}

pub(crate) fn iface_name(name: &str) -> Result<OwnedInterfaceName> {
    Ok(OwnedInterfaceName::try_from(name)?)
}

pub(crate) fn path_value(path: &OwnedObjectPath) -> Result<OwnedValue> {
    owned(path.clone().into_inner())
}

pub(crate) fn path_array(paths: impl IntoIterator<Item = OwnedObjectPath>) -> Result<OwnedValue> {
    let paths: Vec<ObjectPath<'static>> = paths.into_iter().map(OwnedObjectPath::into_inner).collect();
    owned(paths)
}

pub(crate) fn child_path(parent: &OwnedObjectPath, kind: &str, index: usize) -> Result<OwnedObjectPath> {
    Ok(OwnedObjectPath::try_from(format!("{}/{}{}", parent.as_str(), kind, index))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_paths_extend_parent() {
        let parent = OwnedObjectPath::try_from("/com/signal/network").unwrap();
        let service = child_path(&parent, "service", 0).unwrap();
        assert_eq!(service.as_str(), "/com/signal/network/service0");

        let chr = child_path(&service, "char", 3).unwrap();
        assert_eq!(chr.as_str(), "/com/signal/network/service0/char3");
        assert!(chr.as_str().starts_with(service.as_str()));
    }
}
