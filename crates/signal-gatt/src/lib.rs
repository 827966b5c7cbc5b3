//! BlueZ GATT peripheral for the signal-network beacon
//!
//! This crate exposes one primary GATT service with one read/notify
//! characteristic carrying a fixed text payload, bridged to the BlueZ
//! daemon over the D-Bus system bus.
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration and settings
//! - [`error`] - Error types and wire error-name mapping
//! - [`protocol`] - UUIDs, interface names and the default payload
//! - [`gatt`] - The typed object tree and its property-introspection contract
//! - [`bluez`] - D-Bus exposition of the tree and the BlueZ proxies
//! - [`registration`] - The one-shot RegisterApplication handshake
//! - [`server`] - Assembly and run loop
//!
//! ## Usage
//!
//! ```rust,no_run
//! use signal_gatt::{GattServer, GattServerConfig};
//!
//! # async fn example() -> signal_gatt::Result<()> {
//! let config = GattServerConfig::new().with_adapter("hci0".to_string());
//! let server = GattServer::new(config)?;
//!
//! // Serves discovery, reads and writes until interrupted. A failed
//! // registration handshake is logged and does not stop the server.
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod bluez;
pub mod config;
pub mod error;
pub mod gatt;
pub mod protocol;
pub mod registration;
pub mod server;

// Public API exports
pub use config::GattServerConfig;
pub use error::{GattError, Result};
pub use gatt::{
    GattApplication, GattCharacteristic, GattDescriptor, GattObject, GattService, ManagedObjects,
    OptionsMap,
};
pub use registration::{RegistrationClient, RegistrationState};
pub use server::GattServer;
