//! Probepost firmware entry point.
//!
//! On the device this boots ESP-IDF, drives the excitation pins high,
//! wires the real adapters to the control loop, and runs one measurement
//! cycle; the cycle ends in a hardware reset, so the device path never
//! returns.  On any other target it runs a manual single pass against the
//! simulation adapters and exits 0 on success, 1 on failure — the debug
//! invocation for watching the stages without hardware.

use anyhow::Result;
use log::info;

use probepost::adapters::http::HttpsAdapter;
use probepost::adapters::onewire::OneWireAdapter;
use probepost::adapters::platform::PlatformAdapter;
use probepost::adapters::timeserver::UdpTimeServer;
use probepost::adapters::wifi::WifiAdapter;
use probepost::app::cycle::ControlLoop;
use probepost::app::ports::{Devices, PlatformPort as _};
use probepost::config::DeviceConfig;

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::gpio::{AnyOutputPin, OutputPin as _, PinDriver};
    use esp_idf_svc::hal::prelude::Peripherals;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;

    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("probepost v{}", env!("CARGO_PKG_VERSION"));

    let config = DeviceConfig::from_env()?;

    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut platform = PlatformAdapter::new(peripherals.pins.gpio2.downgrade_output())?;

    // Excitation pins go high before anything else so the probes have
    // power for the whole cycle.  Pin numbers were validated against the
    // pin table during config parse.
    for &pin in &config.extra_hots {
        let out = unsafe { AnyOutputPin::new(i32::from(pin.0)) };
        platform.take_hot_pin(pin, PinDriver::output(out)?);
        platform.drive_pin_high(pin);
    }

    let mut devices = Devices {
        net: WifiAdapter::new(peripherals.modem, sys_loop, nvs)?,
        time: UdpTimeServer::new(),
        bus: OneWireAdapter::new(),
        http: HttpsAdapter::new(),
        platform,
    };

    ControlLoop::new(config).run_cycle(&mut devices);

    // run_cycle ends in esp_restart; reaching this line means the reset
    // request failed, which the watchdog will resolve shortly.
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("probepost v{} (host single pass)", env!("CARGO_PKG_VERSION"));

    let config = DeviceConfig::from_env()?;

    let mut platform = PlatformAdapter::new();
    for &pin in &config.extra_hots {
        platform.drive_pin_high(pin);
    }

    let mut devices = Devices {
        net: WifiAdapter::new(),
        time: UdpTimeServer::new(),
        bus: OneWireAdapter::new(),
        http: HttpsAdapter::new(),
        platform,
    };

    // Single pass, no rest epilogue or reset: the caller reads the flag.
    let outcome = ControlLoop::new(config).run_once(&mut devices);
    info!("single pass outcome: {outcome:?}");
    std::process::exit(i32::from(!outcome.success));
}
