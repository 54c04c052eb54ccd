//! Application pipeline: the stages of one measurement cycle and the
//! control loop that sequences them.
//!
//! Each stage consumes hardware only through the port traits in [`ports`],
//! so the whole pipeline runs unmodified against recording mocks on the
//! host.

pub mod connectivity;
pub mod cycle;
pub mod ports;
pub mod registry;
pub mod reporter;
pub mod timesync;
