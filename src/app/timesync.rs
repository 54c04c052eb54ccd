//! Time synchronisation stage.
//!
//! One NTP round trip sets the wall clock; report filenames depend on it,
//! so the stage retries indefinitely on transport faults.  Each attempt is
//! announced by the 3-blink stage code.

use log::{info, warn};

use crate::app::ports::{ExchangeError, PlatformPort, TimeExchangePort};
use crate::clock::Clock;
use crate::error::Result;
use crate::ntp;
use crate::status::{self, StatusSignal};

pub struct TimeSync;

impl TimeSync {
    /// Block until one exchange yields a usable timestamp, then commit it.
    pub fn sync<T, P>(clock: &mut Clock, time: &mut T, platform: &mut P) -> Result<()>
    where
        T: TimeExchangePort,
        P: PlatformPort,
    {
        loop {
            status::signal(platform, StatusSignal::SyncingTime);
            let request = ntp::build_request();
            match time.exchange(&request) {
                Ok(response) => match ntp::transmit_seconds(&response) {
                    Ok(secs) => {
                        clock.set_local_unix(ntp::to_local_unix(secs));
                        info!("timesync: clock set to {}", clock.stamp());
                        return Ok(());
                    }
                    Err(err) => warn!("timesync: unusable response ({err}), retrying"),
                },
                Err(ExchangeError::Send) => warn!("timesync: send failed, retrying"),
                Err(ExchangeError::Timeout) => warn!("timesync: timed out, retrying"),
                Err(ExchangeError::Malformed) => {
                    warn!("timesync: malformed response, retrying");
                }
            }
            platform.feed_watchdog();
        }
    }
}
