//! Ports: the collaborators the control router depends on.
//!
//! Each trait is implemented in the infrastructure layer (`storage`,
//! `feedback`, `network`) and injected into
//! [`ControlContext`](super::control_router::ControlContext) at construction,
//! so tests can substitute in-memory or mock versions.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tvremote_core::{AppSettings, Brand, Device};

/// Errors from a [`SettingsStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error accessing state at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored data could not be decoded.
    #[error("state file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The in-memory state could not be encoded.
    #[error("failed to serialize state: {0}")]
    Serialize(String),
}

/// Key-value persistence for everything that outlives a session.
///
/// Pairing tokens are keyed by TV address; at most one token is kept per
/// address and the latest write wins.
pub trait SettingsStore: Send + Sync {
    fn token(&self, ip: Ipv4Addr) -> Result<Option<String>, StoreError>;
    fn save_token(&self, ip: Ipv4Addr, token: &str) -> Result<(), StoreError>;

    fn devices(&self) -> Result<Vec<Device>, StoreError>;
    fn save_devices(&self, devices: &[Device]) -> Result<(), StoreError>;

    fn brand(&self) -> Result<Option<Brand>, StoreError>;
    fn save_brand(&self, brand: Brand) -> Result<(), StoreError>;

    fn settings(&self) -> Result<Option<AppSettings>, StoreError>;
    fn save_settings(&self, settings: &AppSettings) -> Result<(), StoreError>;
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Surface that reports outcomes to the user (toast, status bar, log).
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Fire-and-forget tactile feedback.
#[cfg_attr(test, mockall::automock)]
pub trait Haptics: Send + Sync {
    fn vibrate(&self, duration: Duration);
}

/// How thoroughly to look for TVs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Every host of the guessed /24, in batches.
    #[default]
    Full,
    /// A handful of commonly assigned addresses on common subnets.
    Quick,
}

/// Finds TVs of a brand on the local network.  Best effort; may return an
/// empty list.
#[async_trait]
pub trait DeviceScanner: Send + Sync {
    async fn scan(&self, brand: Brand, mode: ScanMode) -> Vec<Device>;
}
