//! Status LED signalling.
//!
//! The single on-board LED is the only observability surface in the field,
//! so the blink counts are a wire protocol and must not drift:
//!
//! | signal           | encoding                       |
//! |------------------|--------------------------------|
//! | ConnectingWifi   | 2 blinks, repeats per pass     |
//! | SyncingTime      | 3 blinks, repeats per attempt  |
//! | Reporting        | 4 blinks before the batch      |
//! | ReportComplete   | 5 blinks after the batch       |
//! | rest (success)   | slow toggle, 2 s cadence       |
//! | rest (failure)   | rapid 20-toggle bursts         |
//!
//! The enum decouples the meaning ("connecting") from the physical encoding
//! ("2 blinks"); the pipeline only ever names the meaning.

use crate::app::ports::PlatformPort;

/// Named diagnostic signals, one per pipeline stage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSignal {
    ConnectingWifi,
    SyncingTime,
    Reporting,
    ReportComplete,
}

impl StatusSignal {
    /// The de facto blink-count protocol.  Field-debuggable; do not renumber.
    pub const fn blink_count(self) -> u32 {
        match self {
            Self::ConnectingWifi => 2,
            Self::SyncingTime => 3,
            Self::Reporting => 4,
            Self::ReportComplete => 5,
        }
    }
}

const BLINK_HALF_PERIOD_MS: u32 = 200;
const SIGNAL_REST_MS: u32 = 1000;

/// Flash the stage signal: LED forced low, `2 × count` toggles at 200 ms,
/// low again, then a 1 s gap so consecutive signals stay countable.
pub fn signal<P: PlatformPort>(platform: &mut P, sig: StatusSignal) {
    platform.feed_watchdog();
    platform.set_led(false);
    for _ in 0..sig.blink_count() * 2 {
        platform.sleep_ms(BLINK_HALF_PERIOD_MS);
        platform.toggle_led();
    }
    platform.set_led(false);
    platform.sleep_ms(SIGNAL_REST_MS);
}

/// Success rest: steady heartbeat, one toggle every 2 s for `total_secs`.
pub fn rest_heartbeat<P: PlatformPort>(platform: &mut P, total_secs: u32) {
    platform.set_led(false);
    for _ in 0..total_secs / 2 {
        platform.toggle_led();
        platform.sleep_ms(2000);
        platform.feed_watchdog();
    }
    platform.set_led(false);
}

/// Failure rest: repeating bursts of 20 rapid toggles followed by a 1 s
/// pause — unmistakably "something is wrong" to a human walking past.
/// Each burst takes 3 s; `total_secs` is rounded down to whole bursts.
pub fn rest_failure<P: PlatformPort>(platform: &mut P, total_secs: u32) {
    platform.set_led(false);
    for _ in 0..total_secs / 3 {
        for _ in 0..20 {
            platform.toggle_led();
            platform.sleep_ms(100);
        }
        platform.sleep_ms(1000);
        platform.feed_watchdog();
    }
    platform.set_led(false);
}
