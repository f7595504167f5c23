//! # tvremote-core
//!
//! Shared library for the Smart Remote TV controller containing the domain
//! entities, the per-brand key translation tables, and the JSON/HTTP wire
//! message builders for every supported TV platform.
//!
//! This crate is used by the `tvremote` control crate.  It has zero
//! dependencies on async runtimes, sockets, or storage.
//!
//! # Architecture overview (for beginners)
//!
//! Smart Remote turns a phone (or any host with network access) into a TV
//! remote.  It talks to the TV over the local network using whatever protocol
//! the TV vendor exposes:
//!
//! - **Samsung (Tizen)** – JSON messages over a (secure) WebSocket.
//! - **LG (WebOS)** – JSON `ssap://` requests over a WebSocket, after a
//!   registration handshake.
//! - **TCL (Roku TV)** – one stateless HTTP request per key press (Roku ECP).
//!
//! This crate (`tvremote-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – `Brand`, `Device`, and `AppSettings`: the data every
//!   layer agrees on.
//!
//! - **`keymap`** – Translation tables that convert abstract remote commands
//!   such as `"volume_up"` into the brand-native key code (`KEY_VOLUP`,
//!   `VOLUMEUP`, `VolumeUp`).
//!
//! - **`protocol`** – How commands look on the wire for each brand, plus the
//!   small helpers (base64, request id counter) those formats need.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `tvremote_core::Brand` instead of `tvremote_core::domain::brand::Brand`.
pub use domain::brand::{Brand, BrandInfo, ParseBrandError};
pub use domain::device::{Device, DeviceError};
pub use domain::settings::{AppSettings, Language, SettingsPatch, Theme};
pub use keymap::KeyMapper;
pub use protocol::ProtocolError;
