//! Feedback adapters: where notifications and haptic pulses go when the
//! embedding application has no UI of its own.

use std::time::Duration;

use tracing::{error, info, trace};

use crate::application::ports::{Haptics, NoticeLevel, Notifier};

/// Routes user notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success | NoticeLevel::Info => info!(target: "tvremote::notice", "{message}"),
            NoticeLevel::Error => error!(target: "tvremote::notice", "{message}"),
        }
    }
}

/// Haptics for hosts without a vibration motor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn vibrate(&self, duration: Duration) {
        trace!(?duration, "haptic pulse skipped (no motor)");
    }
}
