//! One-shot registration handshake with the BlueZ GATT manager

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::{info, warn};
use zbus::zvariant::OwnedObjectPath;
use zbus::Connection;

use crate::bluez::GattManagerProxy;
use crate::error::{GattError, Result};

// ----------------------------------------------------------------------------
// Registration state machine
// ----------------------------------------------------------------------------

/// Where the one-shot handshake currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    NotRegistered,
    Pending,
    Registered,
    Failed,
}

/// The handshake outcome, delivered exactly once.
pub type RegistrationOutcome = std::result::Result<(), String>;

/// Announces the application tree to the BlueZ GATT manager.
///
/// `RegisterApplication` is issued once and returns immediately; the outcome
/// arrives later on the dispatch loop. A failed outcome is logged and
/// swallowed: BlueZ may still route connections to the exported tree, so the
/// server keeps serving discovery, reads and writes. No retry is attempted.
pub struct RegistrationClient {
    state: Arc<Mutex<RegistrationState>>,
}

impl RegistrationClient {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistrationState::NotRegistered)),
        }
    }

    pub fn state(&self) -> RegistrationState {
        *self.state.lock().expect("registration state lock poisoned")
    }

    /// Submit the application to the GATT manager at `adapter_path`.
    ///
    /// Returns as soon as the call is in flight; the receiver completes with
    /// the outcome. Failure to obtain the manager handle itself is returned
    /// as an error here, which is fatal upstream.
    pub async fn register(
        &self,
        conn: &Connection,
        adapter_path: &OwnedObjectPath,
        app_path: &OwnedObjectPath,
    ) -> Result<oneshot::Receiver<RegistrationOutcome>> {
        self.mark_pending()?;

        let manager = GattManagerProxy::builder(conn)
            .path(adapter_path.clone())?
            .build()
            .await?;

        let (tx, rx) = oneshot::channel();
        let state = self.state.clone();
        let app_path = app_path.clone();

        tokio::spawn(async move {
            let outcome = manager
                .register_application(&app_path, HashMap::new())
                .await
                .map_err(|err| err.to_string());
            Self::complete_with(&state, &outcome);
            // Nobody may be listening; the outcome is already logged.
            let _ = tx.send(outcome);
        });

        Ok(rx)
    }

    pub(crate) fn mark_pending(&self) -> Result<()> {
        let mut state = self.state.lock().expect("registration state lock poisoned");
        if *state != RegistrationState::NotRegistered {
            return Err(GattError::RegistrationFailed(
                "registration already attempted".to_string(),
            ));
        }
        *state = RegistrationState::Pending;
        Ok(())
    }

    pub(crate) fn complete(&self, outcome: &RegistrationOutcome) {
        Self::complete_with(&self.state, outcome);
    }

    fn complete_with(state: &Mutex<RegistrationState>, outcome: &RegistrationOutcome) {
        let mut state = state.lock().expect("registration state lock poisoned");
        match outcome {
            Ok(()) => {
                *state = RegistrationState::Registered;
                info!("GATT application registered with BlueZ");
            }
            Err(err) => {
                *state = RegistrationState::Failed;
                warn!("Failed to register GATT application: {}", err);
                warn!("Continuing to serve; BlueZ might still accept connections");
            }
        }
    }
}

impl Default for RegistrationClient {
    fn default() -> Self {
        Self::new()
    }
}
