//! The measurement cycle control loop.
//!
//! One cycle walks a fixed stage sequence — connect, sync time, discover,
//! warm up, report — then rests and requests a hardware reset.  The reset
//! at the end of *every* cycle, successful or not, is the crash-only
//! recovery story: each cycle starts from freshly initialised hardware and
//! no state survives except what configuration rebuilds.

use log::{error, info};

use crate::app::connectivity::ConnectivityManager;
use crate::app::ports::{
    Devices, HttpPort, NetworkPort, PlatformPort, SensorBusPort, TimeExchangePort,
};
use crate::app::registry::SensorRegistry;
use crate::app::reporter::Reporter;
use crate::app::timesync::TimeSync;
use crate::clock::Clock;
use crate::config::DeviceConfig;
use crate::error::Error;
use crate::status;

/// Rest before reset after a cycle in which every sensor reported.
const SUCCESS_REST_SECS: u32 = 40 * 60;
/// Shorter rest after any failure, so recovery attempts come sooner.
const FAILURE_REST_SECS: u32 = 10 * 60;

/// Where the cycle currently is; drives logging and the epilogue choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Connecting,
    SyncingTime,
    DiscoveringSensors,
    WarmingUp,
    Reporting,
    Succeeded,
    Failed,
    Resting,
    Resetting,
}

/// What one cycle produced.  `success` requires every sensor to have
/// published; a partial batch rests on the failure schedule so the next
/// attempt comes sooner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
    pub per_sensor: Vec<(String, bool)>,
}

pub struct ControlLoop {
    config: DeviceConfig,
    clock: Clock,
    state: CycleState,
}

impl ControlLoop {
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            clock: Clock::new(),
            state: CycleState::Idle,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    fn enter(&mut self, state: CycleState) {
        self.state = state;
        info!("{} : cycle state -> {state:?}", self.clock.stamp());
    }

    /// Run the stage sequence once.  Fatal faults and interrupts land in
    /// `Failed`; they never panic and never skip the epilogue.
    pub fn run_once<N, T, B, H, P>(&mut self, devices: &mut Devices<N, T, B, H, P>) -> RunOutcome
    where
        N: NetworkPort,
        T: TimeExchangePort,
        B: SensorBusPort,
        H: HttpPort,
        P: PlatformPort,
    {
        match self.try_stages(devices) {
            Ok(outcome) => {
                if outcome.success {
                    self.enter(CycleState::Succeeded);
                } else {
                    self.enter(CycleState::Failed);
                }
                outcome
            }
            Err(Error::Interrupted) => {
                info!("cycle: interrupted, exiting");
                self.enter(CycleState::Failed);
                RunOutcome {
                    success: false,
                    per_sensor: Vec::new(),
                }
            }
            Err(err) => {
                error!("cycle: aborted ({err})");
                self.enter(CycleState::Failed);
                RunOutcome {
                    success: false,
                    per_sensor: Vec::new(),
                }
            }
        }
    }

    fn try_stages<N, T, B, H, P>(
        &mut self,
        devices: &mut Devices<N, T, B, H, P>,
    ) -> crate::error::Result<RunOutcome>
    where
        N: NetworkPort,
        T: TimeExchangePort,
        B: SensorBusPort,
        H: HttpPort,
        P: PlatformPort,
    {
        self.enter(CycleState::Connecting);
        ConnectivityManager::new(&self.config.wifi)
            .ensure_connected(&mut devices.net, &mut devices.platform)?;

        self.enter(CycleState::SyncingTime);
        TimeSync::sync(&mut self.clock, &mut devices.time, &mut devices.platform)?;

        self.enter(CycleState::DiscoveringSensors);
        let handles = SensorRegistry::discover(&self.config.sensors, &mut devices.bus)?;

        self.enter(CycleState::WarmingUp);
        SensorRegistry::warm_up(&handles, &mut devices.bus, &mut devices.platform);

        self.enter(CycleState::Reporting);
        let per_sensor = Reporter::new(self.config.token_url.as_deref()).report_all(
            &handles,
            &self.clock,
            &mut devices.bus,
            &mut devices.http,
            &mut devices.platform,
        )?;

        let success = per_sensor.iter().all(|(_, ok)| *ok);
        Ok(RunOutcome {
            success,
            per_sensor,
        })
    }

    /// One full cycle: stages, rest epilogue, hardware reset.
    ///
    /// On the device the reset does not return; callers on the host see
    /// this return after the mock records the reset request.
    pub fn run_cycle<N, T, B, H, P>(&mut self, devices: &mut Devices<N, T, B, H, P>)
    where
        N: NetworkPort,
        T: TimeExchangePort,
        B: SensorBusPort,
        H: HttpPort,
        P: PlatformPort,
    {
        let outcome = self.run_once(devices);

        self.enter(CycleState::Resting);
        if outcome.success {
            info!("cycle: success, resting {SUCCESS_REST_SECS} s");
            status::rest_heartbeat(&mut devices.platform, SUCCESS_REST_SECS);
        } else {
            info!("cycle: unsuccessful, resting {FAILURE_REST_SECS} s");
            status::rest_failure(&mut devices.platform, FAILURE_REST_SECS);
        }

        self.enter(CycleState::Resetting);
        devices.platform.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;

    #[test]
    fn boot_state_is_idle() {
        let cycle = ControlLoop::new(DeviceConfig::default());
        assert_eq!(cycle.state(), CycleState::Idle);
    }
}
