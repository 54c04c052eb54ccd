//! Device configuration.
//!
//! All four knobs arrive as opaque strings, baked in at build time via
//! `option_env!` (with a runtime environment override for host-side debug
//! runs):
//!
//! | variable     | format                          |
//! |--------------|---------------------------------|
//! | `WIFI`       | `name,ssid,secret;name,ssid,…`  |
//! | `SENSORS`    | `id,port;id,port;…`             |
//! | `EXTRA_HOTS` | `port,port,…`                   |
//! | `TOKEN_URL`  | URL                             |
//!
//! Parsing is pure and strict: a malformed entry anywhere in a list is a
//! fatal configuration error for the whole cycle.  A *missing* `WIFI` or
//! `SENSORS` variable parses to an empty list here — the stage that consumes
//! the list raises the fatal error, matching where the field operator will
//! be looking when the LED shows the stage code.

use heapless::String as FixedString;

use crate::error::{Error, Result};
use crate::pins::{self, PinId};

/// One Wi-Fi association candidate, in configured priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCandidate {
    /// Human-readable label used only in log lines.
    pub name: String,
    pub ssid: FixedString<32>,
    pub secret: FixedString<64>,
}

/// One configured sensor: logical id plus the board port its data line
/// is wired to.  Immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorBinding {
    pub id: String,
    pub port: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeviceConfig {
    pub wifi: Vec<WifiCandidate>,
    pub sensors: Vec<SensorBinding>,
    /// Pins driven permanently high for auxiliary probe excitation wiring.
    pub extra_hots: Vec<PinId>,
    /// Endpoint whose (newline-stripped, reversed) body is the bearer token.
    pub token_url: Option<String>,
}

impl DeviceConfig {
    /// Build-time configuration, overridable from the process environment
    /// for host-side debug passes.
    pub fn from_env() -> Result<Self> {
        Self::from_parts(
            env_or_build("WIFI", option_env!("WIFI")),
            env_or_build("SENSORS", option_env!("SENSORS")),
            env_or_build("EXTRA_HOTS", option_env!("EXTRA_HOTS")),
            env_or_build("TOKEN_URL", option_env!("TOKEN_URL")),
        )
    }

    /// Pure constructor from raw strings; `None` means the variable is unset.
    pub fn from_parts(
        wifi: Option<String>,
        sensors: Option<String>,
        extra_hots: Option<String>,
        token_url: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            wifi: match wifi.as_deref() {
                Some(s) => parse_wifi(s)?,
                None => Vec::new(),
            },
            sensors: match sensors.as_deref() {
                Some(s) => parse_sensors(s)?,
                None => Vec::new(),
            },
            extra_hots: match extra_hots.as_deref() {
                Some(s) => parse_extra_hots(s)?,
                None => Vec::new(),
            },
            token_url: token_url.filter(|s| !s.trim().is_empty()),
        })
    }
}

fn env_or_build(key: &str, build: Option<&str>) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| build.map(str::to_string))
}

/// Parse `name,ssid,secret;…` into an ordered candidate list.
pub fn parse_wifi(raw: &str) -> Result<Vec<WifiCandidate>> {
    let mut out = Vec::new();
    for entry in raw.trim().split(';').filter(|e| !e.trim().is_empty()) {
        let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
        let [name, ssid, secret] = fields[..] else {
            return Err(Error::Config(format!(
                "WIFI entry `{entry}` must be `name,ssid,secret`"
            )));
        };
        if ssid.is_empty() {
            return Err(Error::Config(format!("WIFI entry `{name}` has empty ssid")));
        }
        let mut c = WifiCandidate {
            name: name.to_string(),
            ssid: FixedString::new(),
            secret: FixedString::new(),
        };
        c.ssid
            .push_str(ssid)
            .map_err(|()| Error::Config(format!("WIFI ssid `{ssid}` exceeds 32 bytes")))?;
        c.secret
            .push_str(secret)
            .map_err(|()| Error::Config(format!("WIFI secret for `{name}` exceeds 64 bytes")))?;
        out.push(c);
    }
    Ok(out)
}

/// Parse `id,port;…` into ordered sensor bindings.
///
/// Ids must be unique within a run; duplicates are a config defect.
pub fn parse_sensors(raw: &str) -> Result<Vec<SensorBinding>> {
    let mut out: Vec<SensorBinding> = Vec::new();
    for entry in raw.trim().split(';').filter(|e| !e.trim().is_empty()) {
        let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
        let [id, port] = fields[..] else {
            return Err(Error::Config(format!(
                "SENSORS entry `{entry}` must be `id,port`"
            )));
        };
        if id.is_empty() || port.is_empty() {
            return Err(Error::Config(format!(
                "SENSORS entry `{entry}` has an empty field"
            )));
        }
        if out.iter().any(|b| b.id == id) {
            return Err(Error::Config(format!("duplicate sensor id `{id}`")));
        }
        out.push(SensorBinding {
            id: id.to_string(),
            port: port.to_string(),
        });
    }
    Ok(out)
}

fn parse_extra_hots(raw: &str) -> Result<Vec<PinId>> {
    raw.trim()
        .split(',')
        .filter(|e| !e.trim().is_empty())
        .map(|name| pins::lookup(name.trim()))
        .collect()
}
