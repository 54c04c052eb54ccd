//! GPIO pin name table.
//!
//! Sensor ports arrive in configuration as board-style names (`GP4`).  The
//! table below is the full namespace of names this firmware accepts; the
//! lookup returns an explicit not-found error that enumerates the valid
//! names, since an unknown name means a wiring/config mismatch that a field
//! operator has to resolve by eye.

use crate::error::{Error, Result};

/// A resolved GPIO pin, by hardware number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId(pub u8);

/// Board pin namespace: name → GPIO number.
const PIN_TABLE: &[(&str, u8)] = &[
    ("GP0", 0),
    ("GP1", 1),
    ("GP2", 2),
    ("GP3", 3),
    ("GP4", 4),
    ("GP5", 5),
    ("GP6", 6),
    ("GP7", 7),
    ("GP8", 8),
    ("GP9", 9),
    ("GP10", 10),
    ("GP11", 11),
    ("GP12", 12),
    ("GP13", 13),
    ("GP14", 14),
    ("GP15", 15),
    ("GP16", 16),
    ("GP17", 17),
    ("GP18", 18),
    ("GP19", 19),
    ("GP20", 20),
    ("GP21", 21),
    ("GP22", 22),
    ("GP26", 26),
    ("GP27", 27),
    ("GP28", 28),
];

/// Resolve a configured port name against the pin namespace.
///
/// Unknown names are fatal for the cycle: the error message lists every
/// valid name so the mismatch can be diagnosed from a log line alone.
pub fn lookup(name: &str) -> Result<PinId> {
    PIN_TABLE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, num)| PinId(num))
        .ok_or_else(|| {
            Error::Config(format!(
                "unknown port name `{name}`; valid names are: {}",
                available_names()
            ))
        })
}

fn available_names() -> String {
    let names: Vec<&str> = PIN_TABLE.iter().map(|(n, _)| *n).collect();
    names.join(", ")
}
