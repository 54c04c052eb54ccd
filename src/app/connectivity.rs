//! Wi-Fi association stage.
//!
//! The device is useless without a network, so this stage retries
//! indefinitely: walk the candidate list in configured order, take the
//! first association that sticks, and if a full pass fails, blink the
//! stage code, pause, and go again.  Only an external interrupt or an
//! empty candidate list ends the loop early.

use log::{info, warn};

use crate::app::ports::{NetError, NetworkPort, PlatformPort};
use crate::config::WifiCandidate;
use crate::error::{Error, Result};
use crate::status::{self, StatusSignal};

/// Pause between full passes over the candidate list.
const PASS_PAUSE_MS: u32 = 2000;

pub struct ConnectivityManager<'a> {
    candidates: &'a [WifiCandidate],
}

impl<'a> ConnectivityManager<'a> {
    pub fn new(candidates: &'a [WifiCandidate]) -> Self {
        Self { candidates }
    }

    /// Block until the radio holds an association.
    ///
    /// Idempotent: if the radio is already connected this returns without
    /// touching it.  An empty candidate list is a configuration fault.
    pub fn ensure_connected<N, P>(&self, net: &mut N, platform: &mut P) -> Result<()>
    where
        N: NetworkPort,
        P: PlatformPort,
    {
        if net.is_connected() {
            info!("wifi: already connected, skipping association");
            return Ok(());
        }
        if self.candidates.is_empty() {
            return Err(Error::Config("WIFI candidate list is empty".into()));
        }

        loop {
            status::signal(platform, StatusSignal::ConnectingWifi);
            for candidate in self.candidates {
                info!("wifi: trying candidate `{}`", candidate.name);
                match net.connect(candidate.ssid.as_str(), candidate.secret.as_str()) {
                    Ok(()) => {
                        info!("wifi: associated with `{}`", candidate.name);
                        return Ok(());
                    }
                    Err(NetError::AssociationFailed) => {
                        warn!("wifi: candidate `{}` failed, trying next", candidate.name);
                    }
                    Err(NetError::Interrupted) => return Err(Error::Interrupted),
                }
            }
            warn!("wifi: no candidate associated this pass, retrying");
            platform.feed_watchdog();
            platform.sleep_ms(PASS_PAUSE_MS);
        }
    }
}
