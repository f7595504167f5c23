//! Storage infrastructure: configuration and persisted state.
//!
//! - `config` reads `config.toml` (ports, timeouts, scan ranges).
//! - `state` implements the `SettingsStore` port on top of `state.toml`,
//!   plus an in-memory variant.
//!
//! Both files live in the same platform config directory.

pub mod config;
pub mod state;

pub use config::{load_config_from, ConfigError, RemoteConfig};
pub use state::{MemoryStore, TomlStateStore};
