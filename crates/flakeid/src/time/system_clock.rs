use core::time::Duration;

use crate::TimeSource;

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use web_time::{SystemTime, UNIX_EPOCH};

/// The wall clock, in milliseconds since the Unix epoch.
///
/// Every call reads the system time directly. NTP corrections can move it
/// backwards, which generators surface as
/// [`Error::ClockMovedBackwards`](crate::Error::ClockMovedBackwards).
///
/// A system time before 1970 reads as `0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, millis_saturating)
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn millis_saturating(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
