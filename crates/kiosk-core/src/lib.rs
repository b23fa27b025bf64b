//! kiosk-core
//!
//! Pure session types, input validation, and storage key conventions.
//! No network or storage dependency. This is the shared vocabulary of the
//! kiosk flow.

pub mod complaint;
pub mod error;
pub mod language;
pub mod models;
pub mod storage_keys;
pub mod validation;
