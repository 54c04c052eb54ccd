//! Stage-level behaviour through the public pipeline API.

use probepost::app::connectivity::ConnectivityManager;
use probepost::app::cycle::ControlLoop;
use probepost::app::ports::{Devices, HttpError, NetError};
use probepost::config::DeviceConfig;

use crate::mock_devices::{
    happy_devices, MockBus, MockHttp, MockNet, MockPlatform, MockTime,
};

fn config(wifi: &str, sensors: &str) -> DeviceConfig {
    DeviceConfig::from_parts(
        Some(wifi.to_string()),
        Some(sensors.to_string()),
        None,
        Some("https://tokens.example/one".to_string()),
    )
    .unwrap()
}

#[test]
fn wifi_walks_candidates_and_stops_at_first_success() {
    let cfg = config("a,NetA,pw;b,NetB,pw;c,NetC,pw", "Pantry,GP4");
    let mut net = MockNet::scripted(vec![Err(NetError::AssociationFailed), Ok(())]);
    let mut platform = MockPlatform::new();

    ConnectivityManager::new(&cfg.wifi)
        .ensure_connected(&mut net, &mut platform)
        .unwrap();

    // NetC was never tried; the walk ends at the first association.
    assert_eq!(net.attempts, vec!["NetA", "NetB"]);
}

#[test]
fn connected_radio_is_left_alone() {
    let cfg = config("home,HomeNet,pw", "Pantry,GP4");
    let mut devices = happy_devices(&[(4, 21.5)]);
    devices.net = MockNet::already_connected();

    let outcome = ControlLoop::new(cfg).run_once(&mut devices);

    assert!(outcome.success);
    assert!(devices.net.attempts.is_empty());
}

#[test]
fn missing_probe_aborts_before_any_network_report() {
    // GP5 is configured but nothing answers on its bus.
    let cfg = config("home,HomeNet,pw", "Pantry,GP4;Garage,GP5");
    let mut devices = happy_devices(&[(4, 21.5)]);

    let outcome = ControlLoop::new(cfg).run_once(&mut devices);

    assert!(!outcome.success);
    assert!(outcome.per_sensor.is_empty());
    assert!(devices.http.gets.is_empty(), "token must not be fetched");
    assert!(devices.http.puts.is_empty());
}

#[test]
fn empty_wifi_list_is_a_failed_cycle() {
    let cfg = DeviceConfig::from_parts(
        None,
        Some("Pantry,GP4".to_string()),
        None,
        Some("https://tokens.example/one".to_string()),
    )
    .unwrap();
    let mut devices = happy_devices(&[(4, 21.5)]);

    let outcome = ControlLoop::new(cfg).run_once(&mut devices);

    assert!(!outcome.success);
    assert_eq!(devices.time.exchanges, 0);
}

#[test]
fn one_rejected_put_leaves_the_rest_of_the_batch_intact() {
    let cfg = config("home,HomeNet,pw", "A,GP4;B,GP5");
    let mut devices = Devices {
        net: MockNet::scripted(vec![Ok(())]),
        time: MockTime::fixed(3_953_036_388),
        bus: MockBus::populated(&[(4, 20.0), (5, 22.0)]),
        http: MockHttp::new("tok", vec![Err(HttpError::Transport), Ok(200)]),
        platform: MockPlatform::new(),
    };

    let outcome = ControlLoop::new(cfg).run_once(&mut devices);

    assert!(!outcome.success);
    assert_eq!(
        outcome.per_sensor,
        vec![("A".to_string(), false), ("B".to_string(), true)]
    );
    assert_eq!(devices.http.puts.len(), 2);
}

#[test]
fn put_urls_carry_the_post_path_and_synced_stamp() {
    let cfg = config("home,HomeNet,pw", "Pantry East,GP4");
    let mut devices = happy_devices(&[(4, 21.5)]);

    let outcome = ControlLoop::new(cfg).run_once(&mut devices);

    assert!(outcome.success);
    let (url, _) = &devices.http.puts[0];
    assert_eq!(
        url,
        "https://api.github.com/repos/okielife/TempSensors/contents/\
         _posts/Pantry East/2025-04-07-12-39-48_Pantry East.html"
    );
    assert_eq!(devices.http.auth_headers, vec!["Token 4321"]);
}

#[test]
fn warm_up_takes_two_reads_per_probe_before_reporting() {
    let cfg = config("home,HomeNet,pw", "A,GP4;B,GP5");
    let mut devices = happy_devices(&[(4, 20.0), (5, 22.0)]);

    ControlLoop::new(cfg).run_once(&mut devices);

    // Two warm-up reads plus one reporting read per probe.
    assert_eq!(devices.bus.reads, 6);
}
