//! Probepost firmware library.
//!
//! Periodically samples DS18x20 one-wire temperature probes and publishes
//! each reading as a post to a remote content store over HTTPS.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                     │
//! │                                                            │
//! │  PlatformAdapter   WifiAdapter   UdpTimeServer             │
//! │  (LED+WDT+reset)   (NetworkPort) (TimeExchangePort)        │
//! │  OneWireAdapter    HttpsAdapter                            │
//! │  (SensorBusPort)   (HttpPort)                              │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ──────────────        │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │  ControlLoop (pure pipeline)                     │      │
//! │  │  connect · sync time · discover · warm up ·      │      │
//! │  │  report · rest · reset                           │      │
//! │  └──────────────────────────────────────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline core never touches hardware directly; everything outside
//! the port traits is swappable, so the whole cycle runs against mocks on
//! the host.
#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod ntp;
pub mod pins;
pub mod status;
