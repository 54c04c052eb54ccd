//! UDP transport for the NTP exchange.
//!
//! Same code on both targets: ESP-IDF ships the std networking surface, so
//! one `UdpSocket` implementation covers device and host.  Everything
//! protocol-shaped lives in [`crate::ntp`]; this adapter only moves bytes.

use std::net::UdpSocket;
use std::time::Duration;

use log::warn;

use crate::app::ports::{ExchangeError, TimeExchangePort};
use crate::ntp;

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct UdpTimeServer {
    host: String,
    port: u16,
}

impl UdpTimeServer {
    pub fn new() -> Self {
        Self {
            host: ntp::NTP_HOST.to_string(),
            port: ntp::NTP_PORT,
        }
    }

    /// Point the exchange somewhere else (debug and test runs).
    pub fn with_endpoint(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }
}

impl Default for UdpTimeServer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeExchangePort for UdpTimeServer {
    fn exchange(
        &mut self,
        request: &[u8; ntp::PACKET_LEN],
    ) -> Result<[u8; ntp::PACKET_LEN], ExchangeError> {
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(|err| {
            warn!("timeserver: bind failed ({err})");
            ExchangeError::Send
        })?;
        socket
            .set_read_timeout(Some(EXCHANGE_TIMEOUT))
            .map_err(|_| ExchangeError::Send)?;

        socket
            .send_to(request, (self.host.as_str(), self.port))
            .map_err(|err| {
                warn!("timeserver: send to {}:{} failed ({err})", self.host, self.port);
                ExchangeError::Send
            })?;

        let mut response = [0_u8; ntp::PACKET_LEN];
        let (len, _) = socket.recv_from(&mut response).map_err(|err| {
            if matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ) {
                ExchangeError::Timeout
            } else {
                warn!("timeserver: recv failed ({err})");
                ExchangeError::Malformed
            }
        })?;

        if len < ntp::PACKET_LEN {
            warn!("timeserver: short response ({len} bytes)");
            return Err(ExchangeError::Malformed);
        }
        Ok(response)
    }
}
