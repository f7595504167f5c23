//! Infrastructure layer: everything that touches the network or the disk.
//!
//! - **`tv`** – One `RemoteClient` per TV platform plus the factory that
//!   picks one for a brand.
//! - **`network`** – The best-effort LAN prober behind the `DeviceScanner`
//!   port.
//! - **`storage`** – TOML config and the `SettingsStore` adapters.
//! - **`feedback`** – Log-backed notifier and a no-op haptics hook.

pub mod feedback;
pub mod network;
pub mod storage;
pub mod tv;

#[cfg(test)]
pub(crate) mod test_peers;
