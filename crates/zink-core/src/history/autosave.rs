//! Periodic autosave.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Debounce for periodic autosaves.
#[derive(Debug, Clone)]
pub struct Autosave {
    interval: Duration,
    last: Instant,
}

impl Autosave {
    /// Start the clock now.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    /// Start the clock at `start`.
    #[must_use]
    pub fn starting_at(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            last: start,
        }
    }

    /// Interval between saves.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Check whether more than the interval has passed since the previous
    /// autosave. A `true` result restarts the clock at `now`.
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) > self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

/// Autosave target for a map file: `<file name>.autosave` next to it.
#[must_use]
pub fn autosave_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".autosave");
    path.with_file_name(name)
}
