//! A TV reachable on the local network.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Model label given to devices found by the network prober.
pub const DISCOVERED_MODEL: &str = "Auto-discovered";

/// Errors produced when building a [`Device`] from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The name field was empty or whitespace.
    #[error("enter both the TV name and its IP address")]
    MissingName,

    /// The address is not a dotted-quad IPv4 address.
    #[error("invalid IP address {0:?}; use the format 192.168.1.100")]
    InvalidAddress(String),
}

/// A TV the user can connect to.
///
/// Devices are either found by the prober (`discovered == true`) or entered
/// manually.  The saved device list is persisted by the storage layer, so the
/// struct is `Serialize`/`Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Stable identifier; unique within the saved device list.
    pub id: String,
    /// Name shown in the device list, e.g. `"Living room"`.
    pub name: String,
    /// Model label, free text.
    pub model: String,
    /// IPv4 address of the TV on the LAN.
    pub ip: Ipv4Addr,
    /// `true` when the entry came from a network scan.
    #[serde(default)]
    pub discovered: bool,
}

impl Device {
    /// Builds a device from the "add manually" form.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::MissingName`] for an empty name and
    /// [`DeviceError::InvalidAddress`] if `ip` is not an IPv4 address.
    pub fn manual(name: &str, ip: &str) -> Result<Self, DeviceError> {
        let name = name.trim();
        let ip_text = ip.trim();
        if name.is_empty() || ip_text.is_empty() {
            return Err(DeviceError::MissingName);
        }
        let ip: Ipv4Addr = ip_text
            .parse()
            .map_err(|_| DeviceError::InvalidAddress(ip_text.to_string()))?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            model: "Smart TV".to_string(),
            ip,
            discovered: false,
        })
    }

    /// Builds the entry for a host that answered a discovery probe.
    pub fn discovered(brand_name: &str, ip: Ipv4Addr) -> Self {
        Self {
            id: discovered_id(ip),
            name: format!("TV {brand_name} ({ip})"),
            model: DISCOVERED_MODEL.to_string(),
            ip,
            discovered: true,
        }
    }
}

/// `discovered_192_168_1_50` for `192.168.1.50`.
fn discovered_id(ip: Ipv4Addr) -> String {
    let [a, b, c, d] = ip.octets();
    format!("discovered_{a}_{b}_{c}_{d}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
