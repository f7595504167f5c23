//! TV brand catalog.
//!
//! The selected [`Brand`] decides which brand client the control router
//! instantiates.  Six brands are known to the catalog, but only Samsung, LG
//! and TCL have a working client; the others are listed so the UI can show
//! them as "coming soon".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A TV manufacturer known to the application.
///
/// Serialized in lowercase (`"samsung"`, `"lg"`, ...) both in the persisted
/// state file and in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    Samsung,
    Lg,
    Tcl,
    Sony,
    Philips,
    Panasonic,
}

/// Static, user-facing description of a brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandInfo {
    pub brand: Brand,
    /// Name shown in brand pickers, e.g. `"Samsung"`.
    pub name: &'static str,
    /// Smart-TV platform the brand ships, e.g. `"Tizen OS"`.
    pub platform: &'static str,
    /// `true` when a brand client exists for this brand.
    pub supported: bool,
}

/// Every brand, in brand-picker order.
pub const ALL_BRANDS: [Brand; 6] = [
    Brand::Samsung,
    Brand::Lg,
    Brand::Tcl,
    Brand::Sony,
    Brand::Philips,
    Brand::Panasonic,
];

impl Brand {
    /// Returns the catalog entry for this brand.
    pub const fn info(self) -> BrandInfo {
        match self {
            Brand::Samsung => BrandInfo {
                brand: self,
                name: "Samsung",
                platform: "Tizen OS",
                supported: true,
            },
            Brand::Lg => BrandInfo {
                brand: self,
                name: "LG",
                platform: "WebOS",
                supported: true,
            },
            Brand::Tcl => BrandInfo {
                brand: self,
                name: "TCL",
                platform: "Roku TV",
                supported: true,
            },
            Brand::Sony => BrandInfo {
                brand: self,
                name: "Sony",
                platform: "Android TV",
                supported: false,
            },
            Brand::Philips => BrandInfo {
                brand: self,
                name: "Philips",
                platform: "Saphi/Android",
                supported: false,
            },
            Brand::Panasonic => BrandInfo {
                brand: self,
                name: "Panasonic",
                platform: "My Home Screen",
                supported: false,
            },
        }
    }

    /// Human-readable brand name.
    pub const fn display_name(self) -> &'static str {
        self.info().name
    }

    /// `true` if a brand client is implemented for this brand.
    pub const fn is_supported(self) -> bool {
        self.info().supported
    }

    /// Lowercase identifier used in files and on the command line.
    pub const fn id(self) -> &'static str {
        match self {
            Brand::Samsung => "samsung",
            Brand::Lg => "lg",
            Brand::Tcl => "tcl",
            Brand::Sony => "sony",
            Brand::Philips => "philips",
            Brand::Panasonic => "panasonic",
        }
    }

    /// Returns the catalog entries of all brands.
    pub fn catalog() -> impl Iterator<Item = BrandInfo> {
        ALL_BRANDS.into_iter().map(Brand::info)
    }
}

impl Default for Brand {
    fn default() -> Self {
        Brand::Samsung
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Returned when a string does not name a known brand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown TV brand: {0:?}")]
pub struct ParseBrandError(pub String);

impl FromStr for Brand {
    type Err = ParseBrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_BRANDS
            .into_iter()
            .find(|b| b.id() == wanted)
            .ok_or_else(|| ParseBrandError(s.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
