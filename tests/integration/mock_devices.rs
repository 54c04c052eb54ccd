//! Recording mock adapters for integration tests.
//!
//! Every port call is recorded so tests can assert on the full interaction
//! history.  Sleeps accumulate virtual milliseconds instead of blocking, so
//! a forty-minute rest epilogue runs in microseconds.

use std::collections::HashMap;

use probepost::app::ports::{
    BusError, DeviceAddr, Devices, ExchangeError, HttpError, HttpPort, HttpResponse, NetError,
    NetworkPort, PlatformPort, SensorBusPort, TimeExchangePort,
};
use probepost::ntp;
use probepost::pins::PinId;

// ── Platform ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPlatform {
    pub led_on: bool,
    pub toggles: u32,
    pub feeds: u32,
    /// Virtual time: total milliseconds slept.
    pub slept_ms: u64,
    pub pins_driven_high: Vec<PinId>,
    pub resets: u32,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlatformPort for MockPlatform {
    fn set_led(&mut self, on: bool) {
        self.led_on = on;
    }

    fn toggle_led(&mut self) {
        self.led_on = !self.led_on;
        self.toggles += 1;
    }

    fn feed_watchdog(&mut self) {
        self.feeds += 1;
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.slept_ms += u64::from(ms);
    }

    fn drive_pin_high(&mut self, pin: PinId) {
        self.pins_driven_high.push(pin);
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

// ── Network ───────────────────────────────────────────────────

/// Scripted radio: pops one outcome per `connect` call, records the ssid
/// order, and panics if the pipeline retries past the script's end.
pub struct MockNet {
    pub connected: bool,
    pub script: Vec<Result<(), NetError>>,
    pub attempts: Vec<String>,
}

impl MockNet {
    pub fn already_connected() -> Self {
        Self {
            connected: true,
            script: Vec::new(),
            attempts: Vec::new(),
        }
    }

    pub fn scripted(script: Vec<Result<(), NetError>>) -> Self {
        Self {
            connected: false,
            script,
            attempts: Vec::new(),
        }
    }
}

impl NetworkPort for MockNet {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self, ssid: &str, _secret: &str) -> Result<(), NetError> {
        self.attempts.push(ssid.to_string());
        assert!(
            !self.script.is_empty(),
            "connect called past the scripted outcomes ({} attempts)",
            self.attempts.len()
        );
        let outcome = self.script.remove(0);
        if outcome.is_ok() {
            self.connected = true;
        }
        outcome
    }
}

// ── Time exchange ─────────────────────────────────────────────

pub struct MockTime {
    pub script: Vec<Result<u32, ExchangeError>>,
    pub exchanges: u32,
}

impl MockTime {
    /// Always answers with the given NTP transmit seconds.
    pub fn fixed(ntp_secs: u32) -> Self {
        Self {
            script: vec![Ok(ntp_secs)],
            exchanges: 0,
        }
    }
}

impl TimeExchangePort for MockTime {
    fn exchange(
        &mut self,
        request: &[u8; ntp::PACKET_LEN],
    ) -> Result<[u8; ntp::PACKET_LEN], ExchangeError> {
        assert_eq!(request[0], 0b0010_0011, "request must be a mode-3 client packet");
        self.exchanges += 1;
        assert!(!self.script.is_empty(), "exchange called past the script");
        let outcome = if self.script.len() == 1 {
            self.script[0]
        } else {
            self.script.remove(0)
        };
        outcome.map(|secs| {
            let mut packet = [0_u8; ntp::PACKET_LEN];
            packet[40..44].copy_from_slice(&secs.to_be_bytes());
            packet
        })
    }
}

// ── One-wire bus ──────────────────────────────────────────────

/// Bus with a fixed probe population and per-pin temperatures.
pub struct MockBus {
    pub temps: HashMap<u8, f32>,
    pub reads: u32,
    /// Pins whose reads fail after warm-up (read index tracked per pin).
    pub failing_reads: Vec<u8>,
}

impl MockBus {
    pub fn populated(temps: &[(u8, f32)]) -> Self {
        Self {
            temps: temps.iter().copied().collect(),
            reads: 0,
            failing_reads: Vec::new(),
        }
    }
}

impl SensorBusPort for MockBus {
    fn probe(&mut self, pin: PinId) -> Result<DeviceAddr, BusError> {
        if self.temps.contains_key(&pin.0) {
            Ok(DeviceAddr(0x2800_0000_0000_0000 | u64::from(pin.0)))
        } else {
            Err(BusError::NoDevice)
        }
    }

    fn read_temperature(&mut self, pin: PinId, _device: DeviceAddr) -> Result<f32, BusError> {
        self.reads += 1;
        if self.failing_reads.contains(&pin.0) {
            return Err(BusError::ReadFailed);
        }
        self.temps.get(&pin.0).copied().ok_or(BusError::NoDevice)
    }
}

// ── HTTP ──────────────────────────────────────────────────────

pub struct MockHttp {
    pub token_body: String,
    pub put_statuses: Vec<Result<u16, HttpError>>,
    pub gets: Vec<String>,
    pub puts: Vec<(String, String)>,
    pub auth_headers: Vec<String>,
}

impl MockHttp {
    pub fn new(token_body: &str, put_statuses: Vec<Result<u16, HttpError>>) -> Self {
        Self {
            token_body: token_body.to_string(),
            put_statuses,
            gets: Vec::new(),
            puts: Vec::new(),
            auth_headers: Vec::new(),
        }
    }
}

impl HttpPort for MockHttp {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError> {
        self.gets.push(url.to_string());
        Ok(HttpResponse {
            status: 200,
            body: self.token_body.clone(),
        })
    }

    fn put(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, HttpError> {
        self.puts.push((url.to_string(), body.to_string()));
        for (name, value) in headers {
            if *name == "Authorization" {
                self.auth_headers.push((*value).to_string());
            }
        }
        assert!(!self.put_statuses.is_empty(), "PUT called past the script");
        self.put_statuses.remove(0).map(|status| HttpResponse {
            status,
            body: String::new(),
        })
    }
}

// ── Bundle helper ─────────────────────────────────────────────

pub type MockDevices = Devices<MockNet, MockTime, MockBus, MockHttp, MockPlatform>;

/// A bundle that takes the happy path end to end: connected radio comes up
/// on the first candidate, time syncs, every probe answers, every PUT lands.
pub fn happy_devices(sensor_pins: &[(u8, f32)]) -> MockDevices {
    let put_count = sensor_pins.len();
    Devices {
        net: MockNet::scripted(vec![Ok(())]),
        time: MockTime::fixed(3_953_036_388),
        bus: MockBus::populated(sensor_pins),
        http: MockHttp::new("1\n2\n3\n4", vec![Ok(201); put_count]),
        platform: MockPlatform::new(),
    }
}
