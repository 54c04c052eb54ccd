//! Wall clock with an explicit "never synced" state.
//!
//! The device has no battery-backed RTC: at boot the clock is unset and is
//! advanced only by a successful time-sync exchange.  Every log line and
//! report filename goes through [`Clock::stamp`], which renders a sentinel
//! instead of a fabricated date while the clock is unset, so logs never
//! assert precision they don't have.
//!
//! The committed value is already offset-adjusted local time (see
//! [`crate::ntp`]); between syncs the clock free-runs on the monotonic
//! uptime counter.

use std::time::Instant;

use chrono::DateTime;

/// Rendered in place of a timestamp before the first successful sync.
pub const UNSET_STAMP: &str = "*******************";

/// Report/log timestamp layout: `2025-04-07-16-39-48`.
const STAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

pub struct Clock {
    /// Local Unix seconds at sync, paired with the uptime instant at which
    /// the sync was committed.
    base: Option<(i64, Instant)>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// A fresh, unset clock (boot state).
    pub fn new() -> Self {
        Self { base: None }
    }

    /// Commit an offset-adjusted local Unix time.  Only TimeSync calls this.
    pub fn set_local_unix(&mut self, secs: i64) {
        self.base = Some((secs, Instant::now()));
    }

    pub fn is_set(&self) -> bool {
        self.base.is_some()
    }

    /// Current local Unix seconds, free-running from the last sync.
    pub fn local_unix(&self) -> Option<i64> {
        self.base
            .map(|(secs, at)| secs + at.elapsed().as_secs() as i64)
    }

    /// Timestamp string for logs and report filenames, or the sentinel
    /// while unset.
    pub fn stamp(&self) -> String {
        match self.local_unix().and_then(|s| DateTime::from_timestamp(s, 0)) {
            Some(dt) => dt.format(STAMP_FORMAT).to_string(),
            None => UNSET_STAMP.to_string(),
        }
    }
}
