//! Driven adapters: hardware and network implementations of the port
//! traits in [`crate::app::ports`].
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF drivers (GPIO, TWDT, Wi-Fi
//!   station, TLS HTTP client, one-wire bus).
//! - **all other targets**: simulation stubs so the full pipeline runs on
//!   the host.

pub mod http;
pub mod onewire;
pub mod platform;
pub mod timeserver;
pub mod wifi;
