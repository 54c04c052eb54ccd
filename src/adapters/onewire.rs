//! One-wire bus adapter for DS18x20 probes.
//!
//! One bus per configured data pin, built lazily on first use and cached
//! for the rest of the cycle.  Pin numbers come from the pin table at
//! runtime, so the GPIO is materialised with `AnyIOPin::new` rather than
//! taken from the peripherals struct.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `one_wire_bus` + `ds18b20` over an
//!   open-drain `PinDriver`.
//! - **all other targets**: simulation with one probe per pin at 21.5 °C.

use crate::app::ports::{BusError, DeviceAddr, SensorBusPort};
use crate::pins::PinId;

#[cfg(target_os = "espidf")]
use ds18b20::{Ds18b20, Resolution};
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::{
    delay::Ets,
    gpio::{AnyIOPin, InputOutput, PinDriver, Pull},
};
#[cfg(target_os = "espidf")]
use log::warn;
#[cfg(target_os = "espidf")]
use one_wire_bus::{Address, OneWire};

#[cfg(target_os = "espidf")]
pub struct OneWireAdapter {
    buses: Vec<(PinId, OneWire<PinDriver<'static, AnyIOPin, InputOutput>>)>,
}

#[cfg(target_os = "espidf")]
impl OneWireAdapter {
    pub fn new() -> Self {
        Self { buses: Vec::new() }
    }

    fn bus_for(
        &mut self,
        pin: PinId,
    ) -> Result<&mut OneWire<PinDriver<'static, AnyIOPin, InputOutput>>, BusError> {
        if let Some(index) = self.buses.iter().position(|(id, _)| *id == pin) {
            return Ok(&mut self.buses[index].1);
        }

        // Pin number is validated against the pin table before it gets here.
        let io_pin = unsafe { AnyIOPin::new(i32::from(pin.0)) };
        let mut driver = PinDriver::input_output_od(io_pin).map_err(|_| BusError::BusFault)?;
        driver.set_pull(Pull::Up).map_err(|_| BusError::BusFault)?;
        driver.set_high().map_err(|_| BusError::BusFault)?;
        let bus = OneWire::new(driver).map_err(|err| {
            warn!("onewire: bus init on GP{} failed: {err:?}", pin.0);
            BusError::BusFault
        })?;
        self.buses.push((pin, bus));
        Ok(&mut self.buses.last_mut().unwrap().1)
    }
}

#[cfg(target_os = "espidf")]
impl Default for OneWireAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
impl SensorBusPort for OneWireAdapter {
    fn probe(&mut self, pin: PinId) -> Result<DeviceAddr, BusError> {
        let mut delay = Ets;
        let bus = self.bus_for(pin)?;

        let mut found: Option<Address> = None;
        for addr in bus.devices(false, &mut delay) {
            match addr {
                Ok(address) if address.family_code() == ds18b20::FAMILY_CODE => {
                    found = Some(address);
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("onewire: scan on GP{} failed: {err:?}", pin.0);
                    return Err(BusError::BusFault);
                }
            }
        }
        found.map(|a| DeviceAddr(a.0)).ok_or(BusError::NoDevice)
    }

    fn read_temperature(&mut self, pin: PinId, device: DeviceAddr) -> Result<f32, BusError> {
        let mut delay = Ets;
        let bus = self.bus_for(pin)?;

        let sensor = Ds18b20::new::<core::convert::Infallible>(Address(device.0))
            .map_err(|_| BusError::ReadFailed)?;

        ds18b20::start_simultaneous_temp_measurement(bus, &mut delay)
            .map_err(|_| BusError::ReadFailed)?;
        Resolution::Bits12.delay_for_measurement_time(&mut delay);

        sensor
            .read_data(bus, &mut delay)
            .map(|data| data.temperature)
            .map_err(|_| BusError::ReadFailed)
    }
}

#[cfg(not(target_os = "espidf"))]
pub struct OneWireAdapter;

#[cfg(not(target_os = "espidf"))]
impl OneWireAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for OneWireAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl SensorBusPort for OneWireAdapter {
    fn probe(&mut self, pin: PinId) -> Result<DeviceAddr, BusError> {
        log::info!("onewire(sim): probe on GP{}", pin.0);
        Ok(DeviceAddr(0x2800_0000_0000_0000 | u64::from(pin.0)))
    }

    fn read_temperature(&mut self, _pin: PinId, _device: DeviceAddr) -> Result<f32, BusError> {
        Ok(21.5)
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn sim_addresses_are_stable_per_pin() {
        let mut bus = OneWireAdapter::new();
        let a = bus.probe(PinId(4)).unwrap();
        let b = bus.probe(PinId(4)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, bus.probe(PinId(5)).unwrap());
    }
}
