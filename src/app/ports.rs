//! Port traits — the boundary between the pipeline and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ pipeline stage (domain)
//! ```
//!
//! Driven adapters (radio, UDP socket, HTTPS client, one-wire bus, the
//! LED/watchdog/reset plumbing) implement these traits.  The pipeline
//! consumes them via generics, so the domain core never touches hardware
//! directly and the whole cycle runs against recording mocks on the host.
//!
//! All port errors are typed; callers must handle every variant explicitly.

use core::fmt;

use crate::ntp;
use crate::pins::PinId;

// ───────────────────────────────────────────────────────────────
// Platform port (LED, watchdog, sleep, reset)
// ───────────────────────────────────────────────────────────────

/// The three process-wide hardware singletons (status LED, watchdog,
/// reset line) plus blocking delay, grouped into one port so every stage
/// borrows a single context value.
///
/// Every implementation of `sleep_ms` longer than the watchdog period must
/// be driven through repeated short sleeps with `feed_watchdog` interleaved
/// — the pipeline's retry/rest loops do exactly that.
pub trait PlatformPort {
    fn set_led(&mut self, on: bool);
    fn toggle_led(&mut self);
    fn feed_watchdog(&mut self);
    fn sleep_ms(&mut self, ms: u32);
    /// Drive an auxiliary excitation pin permanently high.
    fn drive_pin_high(&mut self, pin: PinId);
    /// Request a hardware reset.  On the device this does not return; mock
    /// implementations record the request so tests can assert on it.
    fn reset(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Network port (Wi-Fi association)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// This candidate could not be associated — try the next one.
    AssociationFailed,
    /// External abort signal during the blocking attempt.
    Interrupted,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssociationFailed => write!(f, "association failed"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

pub trait NetworkPort {
    /// Whether the radio currently holds an association with an address.
    fn is_connected(&self) -> bool;
    /// Blocking association attempt against one candidate.
    fn connect(&mut self, ssid: &str, secret: &str) -> Result<(), NetError>;
}

// ───────────────────────────────────────────────────────────────
// Time exchange port (one NTP round trip)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeError {
    /// Could not resolve or reach the time server.
    Send,
    /// No response within the transport's timeout.
    Timeout,
    /// Response arrived but was short or unreadable.
    Malformed,
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => write!(f, "send failed"),
            Self::Timeout => write!(f, "timed out"),
            Self::Malformed => write!(f, "malformed response"),
        }
    }
}

pub trait TimeExchangePort {
    /// Perform one request/response datagram exchange with the time server.
    fn exchange(
        &mut self,
        request: &[u8; ntp::PACKET_LEN],
    ) -> Result<[u8; ntp::PACKET_LEN], ExchangeError>;
}

// ───────────────────────────────────────────────────────────────
// One-wire sensor bus port
// ───────────────────────────────────────────────────────────────

/// A one-wire ROM address (64-bit, family code in the low byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAddr(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Bus scan completed but found no attached device.
    NoDevice,
    /// The bus itself misbehaved (shorted line, CRC failure).
    BusFault,
    /// A temperature conversion or scratchpad read failed.
    ReadFailed,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDevice => write!(f, "no device on bus"),
            Self::BusFault => write!(f, "bus fault"),
            Self::ReadFailed => write!(f, "read failed"),
        }
    }
}

pub trait SensorBusPort {
    /// Scan the one-wire bus on `pin` and return the first probe found.
    fn probe(&mut self, pin: PinId) -> Result<DeviceAddr, BusError>;
    /// Run one temperature conversion on a previously probed device.
    fn read_temperature(&mut self, pin: PinId, device: DeviceAddr) -> Result<f32, BusError>;
}

// ───────────────────────────────────────────────────────────────
// HTTPS client port
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// Connection/TLS/socket failure before a status line was received.
    Transport,
    Timeout,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport failure"),
            Self::Timeout => write!(f, "timed out"),
        }
    }
}

pub trait HttpPort {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError>;
    fn put(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, HttpError>;
}

// ───────────────────────────────────────────────────────────────
// Port bundle
// ───────────────────────────────────────────────────────────────

/// Everything the pipeline touches, owned in one place and lent by
/// mutable reference to each stage for the duration of one cycle.
pub struct Devices<N, T, B, H, P> {
    pub net: N,
    pub time: T,
    pub bus: B,
    pub http: H,
    pub platform: P,
}
