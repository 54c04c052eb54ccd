//! Full-cycle scenarios: stages plus rest epilogue plus reset, measured
//! against the virtual-time platform mock.

use probepost::app::cycle::ControlLoop;
use probepost::app::ports::{Devices, HttpError, NetError};
use probepost::config::DeviceConfig;

use crate::mock_devices::{happy_devices, MockBus, MockHttp, MockNet, MockPlatform, MockTime};

const SUCCESS_REST_MS: u64 = 40 * 60 * 1000;
const FAILURE_REST_MS: u64 = 10 * 60 * 1000;

fn config() -> DeviceConfig {
    DeviceConfig::from_parts(
        Some("home,HomeNet,pw".to_string()),
        Some("Pantry,GP4;Garage,GP5".to_string()),
        None,
        Some("https://tokens.example/one".to_string()),
    )
    .unwrap()
}

#[test]
fn successful_cycle_rests_forty_minutes_then_resets() {
    let mut devices = happy_devices(&[(4, 21.5), (5, 19.0)]);

    ControlLoop::new(config()).run_cycle(&mut devices);

    assert_eq!(devices.platform.resets, 1);
    // Rest epilogue dominates the sleep total; stage signals add seconds.
    assert!(devices.platform.slept_ms >= SUCCESS_REST_MS);
    assert!(devices.platform.slept_ms < SUCCESS_REST_MS + 60_000);
    // Heartbeat: 1200 slow toggles during the rest window.
    assert!(devices.platform.toggles >= 1200);
    // Watchdog was fed throughout the rest, not just at stage boundaries.
    assert!(devices.platform.feeds >= 1200);
}

#[test]
fn partial_report_failure_takes_the_short_rest() {
    let mut devices = Devices {
        net: MockNet::scripted(vec![Ok(())]),
        time: MockTime::fixed(3_953_036_388),
        bus: MockBus::populated(&[(4, 20.0), (5, 22.0)]),
        http: MockHttp::new("tok", vec![Ok(201), Err(HttpError::Transport)]),
        platform: MockPlatform::new(),
    };

    ControlLoop::new(config()).run_cycle(&mut devices);

    assert_eq!(devices.platform.resets, 1);
    assert!(devices.platform.slept_ms >= FAILURE_REST_MS);
    assert!(devices.platform.slept_ms < FAILURE_REST_MS + 60_000);
    // Failure pattern: 20 rapid toggles per burst, 200 bursts.
    assert!(devices.platform.toggles >= 200 * 20);
}

#[test]
fn interrupt_skips_the_remaining_stages_but_still_resets() {
    let mut devices = happy_devices(&[(4, 21.5)]);
    devices.net = MockNet::scripted(vec![Err(NetError::Interrupted)]);

    ControlLoop::new(config()).run_cycle(&mut devices);

    assert_eq!(devices.time.exchanges, 0, "no stage after the interrupt ran");
    assert!(devices.http.puts.is_empty());
    assert_eq!(devices.platform.resets, 1);
    assert!(devices.platform.slept_ms >= FAILURE_REST_MS);
}

#[test]
fn every_sensor_success_is_required_for_the_long_rest() {
    // Both PUTs land: long rest.  Then re-run with one sensor's reads
    // failing: short rest.
    let mut ok_devices = happy_devices(&[(4, 21.5), (5, 19.0)]);
    ControlLoop::new(config()).run_cycle(&mut ok_devices);

    let mut failing = happy_devices(&[(4, 21.5), (5, 19.0)]);
    failing.bus.failing_reads.push(5);
    failing.http.put_statuses = vec![Ok(201)]; // only GP4 gets a PUT
    ControlLoop::new(config()).run_cycle(&mut failing);

    assert!(ok_devices.platform.slept_ms > 3 * failing.platform.slept_ms);
}
