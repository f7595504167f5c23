//! Request id counter for the WebOS SSAP protocol.
//!
//! Every request an LG TV receives carries an `id` such as `key_7` so its
//! response can be matched.  The numeric part comes from one shared counter
//! per connection, starting at 1, so key presses and app launches never
//! reuse a number.

use std::sync::atomic::{AtomicU64, Ordering};

/// A thread-safe, monotonically increasing request counter.
///
/// # Examples
///
/// ```rust
/// use tvremote_core::protocol::RequestCounter;
///
/// let counter = RequestCounter::new();
/// assert_eq!(counter.next_id("key"), "key_1");
/// assert_eq!(counter.next_id("command"), "command_2");
/// ```
#[derive(Debug)]
pub struct RequestCounter {
    inner: AtomicU64,
}

impl RequestCounter {
    /// Creates a counter whose first value is 1.
    pub fn new() -> Self {
        Self {
            inner: AtomicU64::new(1),
        }
    }

    /// Returns the next number and advances the counter.
    ///
    /// `Relaxed` is enough: the value only has to be unique, it does not
    /// order any other memory access.
    pub fn next(&self) -> u64 {
        self.inner.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns `"<prefix>_<n>"` with the next number.
    pub fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next())
    }
}

impl Default for RequestCounter {
    fn default() -> Self {
        Self::new()
    }
}
