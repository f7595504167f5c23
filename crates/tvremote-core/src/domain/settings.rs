//! User preferences that influence remote behaviour.
//!
//! Theme and language are carried opaquely for the presentation layer; the
//! control core only reads `vibration_enabled`.

use serde::{Deserialize, Serialize};

/// Light or dark UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

/// Persisted user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
    /// Fire a short haptic pulse on every command.
    #[serde(default = "default_true")]
    pub vibration_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Language::default(),
            vibration_enabled: default_true(),
        }
    }
}

/// A partial settings update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
    pub vibration_enabled: Option<bool>,
}

impl AppSettings {
    /// Returns a copy of `self` with the fields set in `patch` replaced.
    pub fn merged(self, patch: SettingsPatch) -> Self {
        Self {
            theme: patch.theme.unwrap_or(self.theme),
            language: patch.language.unwrap_or(self.language),
            vibration_enabled: patch.vibration_enabled.unwrap_or(self.vibration_enabled),
        }
    }
}
