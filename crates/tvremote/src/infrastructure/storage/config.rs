//! TOML configuration for the remote.
//!
//! Read from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\SmartRemote\config.toml`
//! - Linux:    `~/.config/smartremote/config.toml`
//! - macOS:    `~/Library/Application Support/SmartRemote/config.toml`
//!
//! Every field has a serde default, so a missing file, an empty file and a
//! file with only `[scan]` all load.  Example:
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [samsung]
//! port = 8001
//! secure_context = false
//!
//! [scan]
//! quick_subnets = ["192.168.1", "192.168.50"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tvremote_core::protocol::{roku, samsung, webos};

use crate::infrastructure::network::Subnet24;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub samsung: SamsungConfig,
    #[serde(default)]
    pub lg: LgConfig,
    #[serde(default)]
    pub tcl: TclConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Samsung Tizen channel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SamsungConfig {
    /// 8002 (TLS) or 8001 (plain).
    #[serde(default = "default_samsung_port")]
    pub port: u16,
    #[serde(default = "default_samsung_app_name")]
    pub app_name: String,
    /// Set when embedded in a context that may only open secure sockets;
    /// forces `wss` on 8002.
    #[serde(default)]
    pub secure_context: bool,
    #[serde(default = "default_handshake_timeout_ms")]
    pub connect_timeout_ms: u64,
}

/// LG WebOS settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LgConfig {
    #[serde(default = "default_lg_port")]
    pub port: u16,
    #[serde(default = "default_lg_app_name")]
    pub app_name: String,
    #[serde(default = "default_handshake_timeout_ms")]
    pub connect_timeout_ms: u64,
}

/// TCL Roku ECP settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TclConfig {
    #[serde(default = "default_tcl_port")]
    pub port: u16,
    #[serde(default = "default_tcl_timeout_ms")]
    pub connect_timeout_ms: u64,
}

/// Network prober settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// When `false` every scan returns an empty list without touching the
    /// network.
    #[serde(default = "default_true")]
    pub network_access: bool,
    /// Routers probed, in order, to guess the local /24.
    #[serde(default = "default_gateways")]
    pub gateways: Vec<std::net::Ipv4Addr>,
    #[serde(default = "default_gateway_port")]
    pub gateway_port: u16,
    #[serde(default = "default_gateway_timeout_ms")]
    pub gateway_timeout_ms: u64,
    /// Subnet swept when no gateway answers.
    #[serde(default = "default_fallback_subnet")]
    pub fallback_subnet: Subnet24,
    /// Hosts probed concurrently per batch during a full sweep.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_quick_subnets")]
    pub quick_subnets: Vec<Subnet24>,
    #[serde(default = "default_quick_hosts")]
    pub quick_hosts: Vec<u8>,
    /// Overrides the per-brand fingerprint port (e.g. for a lab proxy).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint_port: Option<u16>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_samsung_port() -> u16 {
    samsung::SECURE_PORT
}
fn default_samsung_app_name() -> String {
    samsung::DEFAULT_APP_NAME.to_string()
}
fn default_handshake_timeout_ms() -> u64 {
    10_000
}
fn default_lg_port() -> u16 {
    webos::PORT
}
fn default_lg_app_name() -> String {
    webos::DEFAULT_APP_NAME.to_string()
}
fn default_tcl_port() -> u16 {
    roku::PORT
}
fn default_tcl_timeout_ms() -> u64 {
    5_000
}
fn default_gateways() -> Vec<std::net::Ipv4Addr> {
    vec![
        [192, 168, 1, 1].into(),
        [192, 168, 0, 1].into(),
        [10, 0, 0, 1].into(),
    ]
}
fn default_gateway_port() -> u16 {
    80
}
fn default_gateway_timeout_ms() -> u64 {
    1_000
}
fn default_fallback_subnet() -> Subnet24 {
    Subnet24::new(192, 168, 1)
}
fn default_batch_size() -> usize {
    50
}
fn default_probe_timeout_ms() -> u64 {
    2_000
}
fn default_quick_subnets() -> Vec<Subnet24> {
    vec![
        Subnet24::new(192, 168, 1),
        Subnet24::new(192, 168, 0),
        Subnet24::new(10, 0, 0),
    ]
}
fn default_quick_hosts() -> Vec<u8> {
    vec![100, 101, 102, 103, 104, 105, 10, 11, 12, 20, 21, 22]
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for SamsungConfig {
    fn default() -> Self {
        Self {
            port: default_samsung_port(),
            app_name: default_samsung_app_name(),
            secure_context: false,
            connect_timeout_ms: default_handshake_timeout_ms(),
        }
    }
}

impl Default for LgConfig {
    fn default() -> Self {
        Self {
            port: default_lg_port(),
            app_name: default_lg_app_name(),
            connect_timeout_ms: default_handshake_timeout_ms(),
        }
    }
}

impl Default for TclConfig {
    fn default() -> Self {
        Self {
            port: default_tcl_port(),
            connect_timeout_ms: default_tcl_timeout_ms(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            network_access: default_true(),
            gateways: default_gateways(),
            gateway_port: default_gateway_port(),
            gateway_timeout_ms: default_gateway_timeout_ms(),
            fallback_subnet: default_fallback_subnet(),
            batch_size: default_batch_size(),
            probe_timeout_ms: default_probe_timeout_ms(),
            quick_subnets: default_quick_subnets(),
            quick_hosts: default_quick_hosts(),
            fingerprint_port: None,
        }
    }
}

impl SamsungConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl LgConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl TclConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl ScanConfig {
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Platform directory holding `config.toml` and `state.toml`.
///
/// # Errors
///
/// [`ConfigError::NoPlatformConfigDir`] when the base directory cannot be
/// determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Full path of the default config file.
///
/// # Errors
///
/// See [`config_dir`].
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from `path`, returning defaults if the file does not
/// exist.
///
/// # Errors
///
/// [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<RemoteConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RemoteConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories.
///
/// # Errors
///
/// [`ConfigError::Io`] or [`ConfigError::Serialize`].
pub fn save_config_to(path: &Path, config: &RemoteConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("SmartRemote"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("smartremote"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("SmartRemote")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
