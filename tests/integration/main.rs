//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a slice of the pipeline
//! against recording mock adapters.  All tests run on the host (x86_64)
//! with no real hardware required.

mod cycle_tests;
mod mock_devices;
mod stage_tests;
