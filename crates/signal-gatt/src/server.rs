//! GATT server assembly and run loop

use std::sync::Arc;

use tracing::{debug, info};
use zbus::zvariant::OwnedObjectPath;
use zbus::Connection;

use crate::bluez::{export_tree, find_adapter, GattManagerProxy};
use crate::config::GattServerConfig;
use crate::error::Result;
use crate::gatt::{GattApplication, GattCharacteristic, GattObject, GattService};
use crate::protocol::{CCCD_UUID, CHAR_UUID, SERVICE_UUID};
use crate::registration::{RegistrationClient, RegistrationState};

/// The peripheral process: one fixed object tree, one system-bus connection,
/// one registration attempt. Not designed for multiple instances per process.
pub struct GattServer {
    config: GattServerConfig,
    app: Arc<GattApplication>,
    registration: RegistrationClient,
}

impl GattServer {
    /// Build the fixed tree from the configuration. The tree never changes
    /// structurally after this point.
    pub fn new(config: GattServerConfig) -> Result<Self> {
        let app = Arc::new(build_tree(&config)?);
        Ok(Self {
            config,
            app,
            registration: RegistrationClient::new(),
        })
    }

    pub fn application(&self) -> &Arc<GattApplication> {
        &self.app
    }

    pub fn registration_state(&self) -> RegistrationState {
        self.registration.state()
    }

    /// Serve until interrupted.
    ///
    /// Adapter lookup failures are fatal and reported before registration is
    /// attempted. The registration outcome itself is awaited on a spawned
    /// task; serving discovery, reads and writes never waits for it.
    pub async fn run(&self) -> Result<()> {
        let conn = Connection::system().await?;
        let adapter_path = find_adapter(&conn, self.config.adapter.as_deref()).await?;
        info!("Serving GATT application on adapter {}", adapter_path);

        export_tree(&conn, &self.app).await?;

        let _outcome = self
            .registration
            .register(&conn, &adapter_path, self.app.object_path())
            .await?;

        tokio::signal::ctrl_c().await?;
        info!("GATT server shutting down");
        self.unregister(&conn, &adapter_path).await;
        Ok(())
    }

    /// Best-effort deregistration on shutdown.
    async fn unregister(&self, conn: &Connection, adapter_path: &OwnedObjectPath) {
        if self.registration.state() != RegistrationState::Registered {
            return;
        }
        let result = async {
            let manager = GattManagerProxy::builder(conn)
                .path(adapter_path.clone())?
                .build()
                .await?;
            manager.unregister_application(self.app.object_path()).await
        }
        .await;
        if let Err(err) = result {
            debug!("UnregisterApplication failed during shutdown: {}", err);
        }
    }
}

/// The fixed signal-network tree: one primary service, one read/notify
/// characteristic serving the configured payload, one CCCD.
fn build_tree(config: &GattServerConfig) -> Result<GattApplication> {
    let payload: Arc<[u8]> = config.payload.as_bytes().into();

    let mut app = GattApplication::new(&config.app_path)?;
    let mut service = GattService::new(app.object_path(), 0, SERVICE_UUID, true)?;

    let mut characteristic = GattCharacteristic::new(
        service.object_path(),
        0,
        CHAR_UUID,
        &["read", "notify"],
        Box::new(move |_options| payload.to_vec()),
        // Writes are accepted and discarded; the payload never changes.
        Box::new(|_value, _options| {}),
    )?;
    characteristic.add_descriptor(CCCD_UUID, &["read", "write"])?;

    service.add_characteristic(characteristic);
    app.add_service(service);
    Ok(app)
}
