//! Sensor discovery and warm-up stage.
//!
//! Discovery is all-or-nothing: every configured binding must resolve to a
//! known port *and* answer a bus scan, or the whole cycle aborts.  A probe
//! that is configured but not found is a wiring fault someone has to go fix;
//! reporting a partial sensor set would hide it.
//!
//! Warm-up takes one throwaway conversion per probe, settles for a second,
//! then reads again for the log.  The first conversion after power-on
//! routinely returns the power-on reset value (85 °C), so it is discarded,
//! errors and all.

use log::{info, warn};

use crate::app::ports::{DeviceAddr, PlatformPort, SensorBusPort};
use crate::config::SensorBinding;
use crate::error::{Error, Result};
use crate::pins::{self, PinId};

/// Per-probe settle time between the throwaway and the logged read.
const SETTLE_MS: u32 = 1000;

/// One discovered probe: configuration identity plus bus address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorHandle {
    pub id: String,
    pub pin: PinId,
    pub device: DeviceAddr,
}

pub struct SensorRegistry;

impl SensorRegistry {
    /// Resolve and probe every configured binding, in configured order.
    pub fn discover<B: SensorBusPort>(
        bindings: &[SensorBinding],
        bus: &mut B,
    ) -> Result<Vec<SensorHandle>> {
        if bindings.is_empty() {
            return Err(Error::Config("SENSORS list is empty".into()));
        }
        let mut handles = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let pin = pins::lookup(&binding.port)?;
            let device = bus.probe(pin).map_err(|err| {
                Error::Wiring(format!(
                    "sensor `{}` on {}: {err}",
                    binding.id, binding.port
                ))
            })?;
            info!("registry: found `{}` on {}", binding.id, binding.port);
            handles.push(SensorHandle {
                id: binding.id.clone(),
                pin,
                device,
            });
        }
        Ok(handles)
    }

    /// Per probe: discard one conversion, settle, read again for the log.
    pub fn warm_up<B, P>(handles: &[SensorHandle], bus: &mut B, platform: &mut P)
    where
        B: SensorBusPort,
        P: PlatformPort,
    {
        for handle in handles {
            let _ = bus.read_temperature(handle.pin, handle.device);
            platform.sleep_ms(SETTLE_MS);
            platform.feed_watchdog();
            match bus.read_temperature(handle.pin, handle.device) {
                Ok(t) => info!("registry: `{}` warmed up, reads {t:.2}", handle.id),
                Err(err) => warn!("registry: `{}` warm-up read failed ({err})", handle.id),
            }
        }
    }
}
