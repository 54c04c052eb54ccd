//! Minimal NTP client codec.
//!
//! One mode-3 datagram out, one datagram back, one 32-bit field parsed.
//! The transport (UDP socket) lives behind
//! [`TimeExchangePort`](crate::app::ports::TimeExchangePort); everything in
//! this module is pure and host-testable.
//!
//! The committed time is shifted by a fixed CST offset with no DST
//! correction.  Known limitation, preserved deliberately: downstream
//! consumers of the report timestamps already compensate.

use crate::error::{Error, Result};

pub const PACKET_LEN: usize = 48;
pub const NTP_HOST: &str = "0.adafruit.pool.ntp.org";
pub const NTP_PORT: u16 = 123;

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970).
pub const NTP_UNIX_OFFSET: i64 = 2_208_988_800;

/// Fixed UTC→CST shift applied to every synced time.  No DST.
pub const LOCAL_OFFSET_SECS: i64 = -5 * 60 * 60;

/// Byte offset of the transmit timestamp in a server response.
const TRANSMIT_TS_OFFSET: usize = 40;

/// Build a client request: LI=0, VN=4, Mode=3, rest zero.
pub fn build_request() -> [u8; PACKET_LEN] {
    let mut packet = [0_u8; PACKET_LEN];
    packet[0] = 0b0010_0011;
    packet
}

/// Extract the transmit-timestamp seconds field from a server response.
pub fn transmit_seconds(response: &[u8; PACKET_LEN]) -> Result<u32> {
    let secs = u32::from_be_bytes([
        response[TRANSMIT_TS_OFFSET],
        response[TRANSMIT_TS_OFFSET + 1],
        response[TRANSMIT_TS_OFFSET + 2],
        response[TRANSMIT_TS_OFFSET + 3],
    ]);
    if secs == 0 {
        // A zeroed transmit timestamp means the server refused us (KoD or
        // malformed exchange) — treat as a failed attempt, not as 1900.
        return Err(Error::Transport("NTP response has zero timestamp".into()));
    }
    Ok(secs)
}

/// NTP seconds → offset-adjusted local Unix seconds.
pub fn to_local_unix(ntp_secs: u32) -> i64 {
    i64::from(ntp_secs) - NTP_UNIX_OFFSET + LOCAL_OFFSET_SECS
}
