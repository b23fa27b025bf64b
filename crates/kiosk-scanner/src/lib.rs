//! kiosk-scanner
//!
//! Vitals acquisition: drives a face-scan SDK through its lifecycle and
//! turns a finished measurement into backend submissions.

pub mod adapter;
pub mod error;
pub mod lifecycle;
pub mod sdk;

pub use adapter::{ScanSettings, VitalsAdapter};
pub use error::ScannerError;
pub use lifecycle::{SdkLifecycle, SdkState};
pub use sdk::{
    Heartbeat, InitOptions, MeasurementConfig, MeasurementResults, Metric, ScanSdk, SdkEvent,
    SdkLoader,
};
