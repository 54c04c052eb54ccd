//! Board platform adapter: status LED, task watchdog, blocking delay,
//! auxiliary excitation pins, and the reset line.
//!
//! On ESP-IDF the watchdog is the TWDT, configured to panic (and thus
//! reset) if the main task stalls for more than 10 s; every long sleep in
//! the pipeline is built from short sleeps with feeds in between.

use log::info;

use crate::app::ports::PlatformPort;
use crate::pins::PinId;

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::{
    delay::FreeRtos,
    gpio::{AnyOutputPin, Output, PinDriver},
};

#[cfg(target_os = "espidf")]
const WATCHDOG_TIMEOUT_MS: u32 = 10_000;

pub struct PlatformAdapter {
    #[cfg(target_os = "espidf")]
    led: PinDriver<'static, AnyOutputPin, Output>,
    #[cfg(target_os = "espidf")]
    hot_pins: Vec<(PinId, PinDriver<'static, AnyOutputPin, Output>)>,
    #[cfg(target_os = "espidf")]
    watchdog_subscribed: bool,
    led_on: bool,
}

#[cfg(target_os = "espidf")]
impl PlatformAdapter {
    /// Take the LED pin, configure the TWDT, and subscribe the main task.
    pub fn new(led_pin: AnyOutputPin) -> anyhow::Result<Self> {
        let led = PinDriver::output(led_pin)?;

        let subscribed = unsafe {
            let cfg = esp_idf_svc::sys::esp_task_wdt_config_t {
                timeout_ms: WATCHDOG_TIMEOUT_MS,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            let ret = esp_idf_svc::sys::esp_task_wdt_reconfigure(&cfg);
            if ret != esp_idf_svc::sys::ESP_OK {
                log::warn!("TWDT reconfigure returned {ret} (may already be configured)");
            }
            esp_idf_svc::sys::esp_task_wdt_add(core::ptr::null_mut()) == esp_idf_svc::sys::ESP_OK
        };
        if subscribed {
            info!("platform: watchdog subscribed ({WATCHDOG_TIMEOUT_MS} ms, panic on trigger)");
        } else {
            log::warn!("platform: watchdog subscribe failed, running unguarded");
        }

        Ok(Self {
            led,
            hot_pins: Vec::new(),
            watchdog_subscribed: subscribed,
            led_on: false,
        })
    }

    /// Register an excitation pin driver resolved from the pin table.
    pub fn take_hot_pin(&mut self, pin: PinId, driver: PinDriver<'static, AnyOutputPin, Output>) {
        self.hot_pins.push((pin, driver));
    }
}

#[cfg(not(target_os = "espidf"))]
impl PlatformAdapter {
    pub fn new() -> Self {
        info!("platform(sim): LED/watchdog/reset are virtual");
        Self { led_on: false }
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for PlatformAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformPort for PlatformAdapter {
    fn set_led(&mut self, on: bool) {
        self.led_on = on;
        #[cfg(target_os = "espidf")]
        {
            let _ = if on {
                self.led.set_high()
            } else {
                self.led.set_low()
            };
        }
    }

    fn toggle_led(&mut self) {
        let next = !self.led_on;
        self.set_led(next);
    }

    fn feed_watchdog(&mut self) {
        #[cfg(target_os = "espidf")]
        if self.watchdog_subscribed {
            unsafe {
                esp_idf_svc::sys::esp_task_wdt_reset();
            }
        }
    }

    fn sleep_ms(&mut self, ms: u32) {
        #[cfg(target_os = "espidf")]
        FreeRtos::delay_ms(ms);

        #[cfg(not(target_os = "espidf"))]
        {
            // Host runs compress time 100:1 so a debug cycle finishes quickly.
            let compressed = u64::from(ms / 100).max(1);
            std::thread::sleep(std::time::Duration::from_millis(compressed));
        }
    }

    fn drive_pin_high(&mut self, pin: PinId) {
        #[cfg(target_os = "espidf")]
        {
            if let Some((_, driver)) = self.hot_pins.iter_mut().find(|(id, _)| *id == pin) {
                let _ = driver.set_high();
                info!("platform: GP{} driven high", pin.0);
            } else {
                log::warn!("platform: GP{} has no registered driver", pin.0);
            }
        }

        #[cfg(not(target_os = "espidf"))]
        info!("platform(sim): GP{} driven high", pin.0);
    }

    fn reset(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            info!("platform: hardware reset");
            unsafe { esp_idf_svc::sys::esp_restart() };
        }

        #[cfg(not(target_os = "espidf"))]
        info!("platform(sim): reset requested, process continues");
    }
}
