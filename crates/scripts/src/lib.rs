//! `backstore-scripts` library crate.
//!
//! Configuration and logging shared by the `run-setup` and
//! `add-terms-accepted` binaries, exposed here for testing.

pub mod config;
pub mod logging;
