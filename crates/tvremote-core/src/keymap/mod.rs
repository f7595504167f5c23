//! Translation tables from abstract remote commands to brand-native key codes.
//!
//! The canonical representation is a short lowercase command id such as
//! `"volume_up"`, `"home"` or `"7"`.  Each brand client translates these ids
//! into whatever its TV understands at the moment a key is sent.
//!
//! # Why a table per brand? (for beginners)
//!
//! Every TV platform names its keys differently.  Samsung wants `KEY_VOLUP`,
//! LG's WebOS wants `VOLUMEUP` and a Roku TV wants `VolumeUp`.  Keeping one
//! `match` per brand makes each table easy to audit against the vendor's
//! documentation, and the compiler turns the `match` into a jump table so the
//! lookup costs next to nothing on the key-press path.

pub mod roku;
pub mod samsung;
pub mod webos;

use crate::domain::brand::Brand;

/// Every abstract command id known to at least one brand table.
pub const COMMANDS: &[&str] = &[
    "power",
    "power_off",
    "volume_up",
    "volume_down",
    "mute",
    "channel_up",
    "channel_down",
    "up",
    "down",
    "left",
    "right",
    "enter",
    "back",
    "home",
    "menu",
    "source",
    "tools",
    "info",
    "play",
    "pause",
    "stop",
    "rewind",
    "forward",
    "0",
    "1",
    "2",
    "3",
    "4",
    "5",
    "6",
    "7",
    "8",
    "9",
];

/// Unified key mapper for all brands.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates an abstract command into the native key code for `brand`.
    ///
    /// Returns `None` when the brand has no mapping for `command`.  Brands
    /// without a client (Sony, Philips, Panasonic) have empty tables.
    pub fn translate(brand: Brand, command: &str) -> Option<&'static str> {
        match brand {
            Brand::Samsung => samsung::to_native(command),
            Brand::Lg => webos::to_native(command),
            Brand::Tcl => roku::to_native(command),
            Brand::Sony | Brand::Philips | Brand::Panasonic => None,
        }
    }

    /// `true` if `key` is already one of `brand`'s native key codes.
    ///
    /// Used to let callers send raw codes (e.g. `"KEY_SOURCE"`) straight
    /// through without an abstract id.
    pub fn is_native(brand: Brand, key: &str) -> bool {
        // Linear scan; only reached for strings the forward table rejected.
        COMMANDS
            .iter()
            .any(|command| Self::translate(brand, command) == Some(key))
    }

    /// Resolves what should go on the wire for `input`.
    ///
    /// Abstract ids are translated; native codes pass through unchanged;
    /// anything else yields `None` and must not be sent.
    pub fn resolve(brand: Brand, input: &str) -> Option<String> {
        if let Some(native) = Self::translate(brand, input) {
            return Some(native.to_string());
        }
        if Self::is_native(brand, input) {
            tracing::trace!(%brand, key = input, "passing native key code through");
            return Some(input.to_string());
        }
        None
    }
}
