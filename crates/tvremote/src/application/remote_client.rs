//! The brand-independent remote-control capability.
//!
//! Every supported TV platform gets one [`RemoteClient`] implementation in
//! `infrastructure::tv`.  The control router only ever sees the trait, so it
//! can swap brands without knowing how Samsung, LG or TCL sessions work.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use tvremote_core::{Brand, Device, DeviceError};

use super::ports::StoreError;

/// What happened to a key press.
///
/// Sending is fire-and-forget, so `Sent` means "handed to the transport",
/// not "acknowledged by the TV".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The native key code was queued for transmission.
    Sent,
    /// The command has no mapping for this brand; nothing was sent.
    Unmapped,
    /// No live session; nothing was sent.
    NotConnected,
    /// The active brand does not support the requested operation.
    Unsupported,
}

/// Errors from connecting to a TV or managing the device list.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The socket or HTTP request failed before a session was established.
    #[error("{brand} connection to {address} failed: {reason}")]
    Transport {
        brand: Brand,
        address: String,
        reason: String,
    },

    /// The TV did not complete the handshake within the allowed window.
    #[error("Timeout: {brand} TV did not respond in {} seconds", .after.as_secs_f32())]
    Timeout { brand: Brand, after: Duration },

    /// The TV answered the registration with an error, usually because the
    /// user declined the pairing prompt.
    #[error("{brand} TV rejected pairing: {reason}")]
    PairingRejected { brand: Brand, reason: String },

    /// No client exists for the selected brand.
    #[error("{0} TVs are not supported yet")]
    UnsupportedBrand(Brand),

    /// A manually entered address is not dotted-quad IPv4.
    #[error("invalid IP address {0:?}; use the format 192.168.1.100")]
    InvalidAddress(String),

    /// A manually entered device has no name or address.
    #[error("enter both the TV name and its IP address")]
    MissingName,

    /// The settings store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

const CHECKLIST: &str = "Check that:\n\
    • the TV is switched on\n\
    • the TV is on the same Wi-Fi network as this device\n\
    • the IP address is correct\n\
    • the TV's remote-control port (8002 for Samsung, 3000 for LG, 8060 for TCL) is reachable";

impl ControlError {
    /// Guidance to show the user after a failed connection attempt.
    ///
    /// Only network failures have actionable advice; other errors return
    /// `None`.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            ControlError::Transport { .. } | ControlError::Timeout { .. } => Some(CHECKLIST),
            ControlError::PairingRejected { .. } => {
                Some("Accept the connection request shown on the TV, then try again.")
            }
            _ => None,
        }
    }
}

impl From<DeviceError> for ControlError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::MissingName => ControlError::MissingName,
            DeviceError::InvalidAddress(ip) => ControlError::InvalidAddress(ip),
        }
    }
}

/// A connection to one TV of one brand.
///
/// Lifecycle: created disconnected by a [`ClientFactory`], `connect()` opens
/// the session, `disconnect()` (or the TV closing the socket) ends it.  A
/// client is not reused after `disconnect()`.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// The brand this client speaks to.
    fn brand(&self) -> Brand;

    /// Opens the session.
    ///
    /// `Ok(true)` means the TV is ready for key presses.  `Ok(false)` is a
    /// soft failure the TV reported without a transport error (used by
    /// brands whose handshake is a plain HTTP probe).
    ///
    /// # Errors
    ///
    /// [`ControlError::Timeout`], [`ControlError::Transport`] or
    /// [`ControlError::PairingRejected`] depending on how the handshake
    /// failed.
    async fn connect(&mut self) -> Result<bool, ControlError>;

    /// Translates `command` and hands it to the transport.
    ///
    /// Never blocks and never suspends.  Unmapped commands and calls while
    /// disconnected are logged and reported through the outcome.
    fn send_key(&self, command: &str) -> SendOutcome;

    /// Launches an app on the TV by platform app id.
    fn launch_app(&self, app_id: &str) -> SendOutcome {
        warn!(brand = %self.brand(), app_id, "app launch is not supported for this brand");
        SendOutcome::Unsupported
    }

    /// Closes the session.  Idempotent.
    fn disconnect(&mut self);

    /// `true` while the session is usable.
    fn connection_status(&self) -> bool;
}

/// Builds the [`RemoteClient`] for a brand.
pub trait ClientFactory: Send + Sync {
    /// Returns a disconnected client for `device`.
    ///
    /// `token` is the pairing token previously stored for the device, if any.
    ///
    /// # Errors
    ///
    /// [`ControlError::UnsupportedBrand`] when no client exists for `brand`.
    fn create(
        &self,
        brand: Brand,
        device: &Device,
        token: Option<String>,
    ) -> Result<Box<dyn RemoteClient>, ControlError>;
}
