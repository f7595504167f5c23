//! tvremote library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does tvremote do? (for beginners)
//!
//! `tvremote` turns any host on the same Wi-Fi as a smart TV into a remote
//! control.  An embedding application (a phone UI, a desktop tray app, the
//! bundled `tvremote` CLI) owns one [`ControlContext`] and calls:
//!
//! 1. `scan_for_devices` to probe the local /24 for TVs of the selected brand.
//! 2. `connect_to_tv` to open a session.  Samsung and LG TVs may show a
//!    pairing prompt the first time; the token they issue is saved so later
//!    connections skip it.
//! 3. `send_command("volume_up")` for every button press.  The command is
//!    translated to the brand's native key code and written to the TV
//!    without waiting for a reply.
//! 4. `disconnect` when done.
//!
//! [`ControlContext`]: application::control_router::ControlContext

/// Application layer: the control router and the ports it depends on.
pub mod application;

/// Infrastructure layer: brand clients, network prober, storage, feedback.
pub mod infrastructure;
