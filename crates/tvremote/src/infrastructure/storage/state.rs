//! Settings-store adapters.
//!
//! [`TomlStateStore`] keeps pairing tokens, saved devices, the selected brand
//! and user settings in `state.toml` next to the config file.  The whole file
//! is rewritten on every save; it is a few hundred bytes at most.
//!
//! [`MemoryStore`] keeps the same data in memory only, for embedding
//! applications that persist elsewhere and for tests.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;
use tvremote_core::{AppSettings, Brand, Device};

use crate::application::ports::{SettingsStore, StoreError};

/// On-disk layout of `state.toml`.
///
/// Field order matters for TOML: plain values before tables, tables before
/// arrays of tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    brand: Option<Brand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    settings: Option<AppSettings>,
    /// Pairing tokens keyed by TV address.
    #[serde(default)]
    tokens: BTreeMap<String, String>,
    #[serde(default)]
    devices: Vec<Device>,
}

fn lock(state: &Mutex<PersistedState>) -> MutexGuard<'_, PersistedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── TOML file store ───────────────────────────────────────────────────────────

/// File-backed [`SettingsStore`].
pub struct TomlStateStore {
    path: PathBuf,
    state: Mutex<PersistedState>,
}

impl TomlStateStore {
    /// Opens (or lazily creates) the state file at `path`.
    ///
    /// A missing file is an empty state; it is created on the first save.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file exists but cannot be read and
    /// [`StoreError::Corrupt`] if it is not valid state TOML.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedState::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!("state loaded from {}", path.display());
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Applies `change` to a copy of the state and keeps the copy only once
    /// it is on disk.
    fn update(&self, change: impl FnOnce(&mut PersistedState)) -> Result<(), StoreError> {
        let mut state = lock(&self.state);
        let mut next = state.clone();
        change(&mut next);
        let content =
            toml::to_string_pretty(&next).map_err(|e| StoreError::Serialize(e.to_string()))?;

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        *state = next;
        Ok(())
    }
}

impl SettingsStore for TomlStateStore {
    fn token(&self, ip: Ipv4Addr) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.state).tokens.get(&ip.to_string()).cloned())
    }

    fn save_token(&self, ip: Ipv4Addr, token: &str) -> Result<(), StoreError> {
        self.update(|s| {
            s.tokens.insert(ip.to_string(), token.to_string());
        })
    }

    fn devices(&self) -> Result<Vec<Device>, StoreError> {
        Ok(lock(&self.state).devices.clone())
    }

    fn save_devices(&self, devices: &[Device]) -> Result<(), StoreError> {
        self.update(|s| s.devices = devices.to_vec())
    }

    fn brand(&self) -> Result<Option<Brand>, StoreError> {
        Ok(lock(&self.state).brand)
    }

    fn save_brand(&self, brand: Brand) -> Result<(), StoreError> {
        self.update(|s| s.brand = Some(brand))
    }

    fn settings(&self) -> Result<Option<AppSettings>, StoreError> {
        Ok(lock(&self.state).settings)
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<(), StoreError> {
        self.update(|s| s.settings = Some(*settings))
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Non-persistent [`SettingsStore`].
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<PersistedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn token(&self, ip: Ipv4Addr) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.state).tokens.get(&ip.to_string()).cloned())
    }

    fn save_token(&self, ip: Ipv4Addr, token: &str) -> Result<(), StoreError> {
        lock(&self.state)
            .tokens
            .insert(ip.to_string(), token.to_string());
        Ok(())
    }

    fn devices(&self) -> Result<Vec<Device>, StoreError> {
        Ok(lock(&self.state).devices.clone())
    }

    fn save_devices(&self, devices: &[Device]) -> Result<(), StoreError> {
        lock(&self.state).devices = devices.to_vec();
        Ok(())
    }

    fn brand(&self) -> Result<Option<Brand>, StoreError> {
        Ok(lock(&self.state).brand)
    }

    fn save_brand(&self, brand: Brand) -> Result<(), StoreError> {
        lock(&self.state).brand = Some(brand);
        Ok(())
    }

    fn settings(&self) -> Result<Option<AppSettings>, StoreError> {
        Ok(lock(&self.state).settings)
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<(), StoreError> {
        lock(&self.state).settings = Some(*settings);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
