//! Brand clients and the factory that picks one.
//!
//! | Brand   | Client            | Transport                          |
//! |---------|-------------------|------------------------------------|
//! | Samsung | [`SamsungClient`] | WebSocket (`ws`/`wss`), port 8002  |
//! | LG      | [`LgClient`]      | WebSocket + SSAP registration, 3000|
//! | TCL     | [`TclClient`]     | Roku ECP over HTTP, port 8060      |
//!
//! Sony, Philips and Panasonic are listed in the brand catalog but have no
//! client; the factory rejects them with `UnsupportedBrand`.

pub mod lg;
pub mod samsung;
pub(crate) mod session;
pub mod tcl;

use std::sync::Arc;

use tracing::debug;
use tvremote_core::{Brand, Device};

pub use lg::LgClient;
pub use samsung::SamsungClient;
pub use tcl::TclClient;

use crate::application::ports::SettingsStore;
use crate::application::remote_client::{ClientFactory, ControlError, RemoteClient};
use crate::infrastructure::storage::config::RemoteConfig;

/// Builds real network clients from the loaded configuration.
pub struct BrandClientFactory {
    config: RemoteConfig,
    store: Arc<dyn SettingsStore>,
}

impl BrandClientFactory {
    /// `store` receives pairing tokens the TVs issue after connecting.
    pub fn new(config: RemoteConfig, store: Arc<dyn SettingsStore>) -> Self {
        Self { config, store }
    }
}

impl ClientFactory for BrandClientFactory {
    fn create(
        &self,
        brand: Brand,
        device: &Device,
        token: Option<String>,
    ) -> Result<Box<dyn RemoteClient>, ControlError> {
        debug!(%brand, ip = %device.ip, has_token = token.is_some(), "creating client");
        let store = Arc::clone(&self.store);
        match brand {
            Brand::Samsung => Ok(Box::new(SamsungClient::new(
                device.ip,
                self.config.samsung.clone(),
                token,
                store,
            ))),
            Brand::Lg => Ok(Box::new(LgClient::new(
                device.ip,
                self.config.lg.clone(),
                token,
                store,
            ))),
            Brand::Tcl => Ok(Box::new(TclClient::new(device.ip, self.config.tcl.clone()))),
            Brand::Sony | Brand::Philips | Brand::Panasonic => {
                Err(ControlError::UnsupportedBrand(brand))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
