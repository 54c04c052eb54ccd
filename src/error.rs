//! Unified error types for the probepost firmware.
//!
//! A single `Error` enum that every pipeline stage funnels into, keeping the
//! control loop's error handling uniform.  Variants fall into the two classes
//! the pipeline distinguishes: fatal configuration/wiring faults that abort
//! the cycle, and transport faults that the owning stage either retries
//! (Wi-Fi, time sync) or records per item (report PUTs).

use core::fmt;

/// Every fatal, pipeline-aborting fault funnels into this type.
///
/// Transient faults (a single failed association attempt, one bad NTP
/// exchange, one failed PUT) never appear here — they are swallowed and
/// retried, or recorded as a per-sensor boolean, by the stage that saw them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration is missing, empty, or malformed.  Indicates a setup
    /// defect rather than a transient fault — never retried within a cycle.
    Config(String),
    /// A configured port name or probed bus did not match the hardware.
    /// Wiring mismatches cannot be retried away.
    Wiring(String),
    /// An HTTP exchange that the pipeline cannot proceed without
    /// (token retrieval) failed at the transport level.
    Transport(String),
    /// External abort signal (keyboard interrupt in debug contexts).
    /// Logged and surfaced, never retried.
    Interrupted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Wiring(msg) => write!(f, "wiring: {msg}"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

impl core::error::Error for Error {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
