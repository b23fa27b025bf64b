//! kiosk-app library root.
//!
//! Re-exports the config layer and the terminal driver so integration
//! tests can run whole sessions against a scripted terminal.

pub mod config;
pub mod driver;
