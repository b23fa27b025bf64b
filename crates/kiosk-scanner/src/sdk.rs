//! The face-scan SDK boundary.
//!
//! The vendor SDK is a black box behind [`ScanSdk`]. It is loaded lazily
//! through an [`SdkLoader`] and reports progress as [`SdkEvent`]s on the
//! channel handed to [`ScanSdk::initialize`].

use std::sync::Arc;

use kiosk_api::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::ScannerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metric {
    HeartRate,
    HrvSdnn,
    BreathingRate,
    SystolicBp,
    DiastolicBp,
    CardiacStress,
    PnsActivity,
    CardiacWorkload,
    Age,
    Bmi,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::HeartRate,
        Metric::HrvSdnn,
        Metric::BreathingRate,
        Metric::SystolicBp,
        Metric::DiastolicBp,
        Metric::CardiacStress,
        Metric::PnsActivity,
        Metric::CardiacWorkload,
        Metric::Age,
        Metric::Bmi,
    ];
}

/// Custom measurement applied when the visitor presses start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementConfig {
    pub duration_secs: u32,
    pub instant_metrics: Vec<Metric>,
    pub summary_metrics: Vec<Metric>,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            duration_secs: 100,
            instant_metrics: Metric::ALL.to_vec(),
            summary_metrics: Metric::ALL.to_vec(),
        }
    }
}

/// Options passed at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    pub hide_logo: bool,
    /// Use the custom measurement preset so [`MeasurementConfig`] applies.
    pub custom_preset: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            hide_logo: true,
            custom_preset: true,
        }
    }
}

/// Summary values computed at the end of a measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResults {
    pub breathing_rate_bpm: Option<f64>,
    pub hrv_sdnn_ms: Option<f64>,
    pub systolic_blood_pressure_mmhg: Option<f64>,
    pub diastolic_blood_pressure_mmhg: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub duration_ms: f64,
}

/// What the SDK tells us while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkEvent {
    StartButtonClicked,
    MeasurementFinished,
    CameraError(String),
}

pub trait ScanSdk: Send + Sync {
    /// Start the SDK. Events arrive on `events` until [`deinitialize`](Self::deinitialize).
    fn initialize(
        &self,
        api_key: &str,
        user_id: Option<&str>,
        options: &InitOptions,
        events: UnboundedSender<SdkEvent>,
    ) -> Result<(), ScannerError>;

    fn set_measurement_config(&self, config: &MeasurementConfig) -> Result<(), ScannerError>;

    fn heart_rate_10s(&self) -> Option<f64>;
    fn heart_rate_4s(&self) -> Option<f64>;
    fn realtime_heart_rate(&self) -> Option<f64>;
    fn realtime_hrv_sdnn(&self) -> Option<f64>;
    fn realtime_cardiac_stress(&self) -> Option<f64>;

    /// Vendor-defined risk breakdown, forwarded to the backend as-is.
    fn health_risks(&self) -> serde_json::Value;

    fn measurement_results(&self) -> Option<MeasurementResults>;

    /// Beats observed over the last `window_secs` seconds.
    fn realtime_heartbeats(&self, window_secs: u32) -> Vec<Heartbeat>;

    fn deinitialize(&self);
}

/// Loads the SDK runtime. Loading may fail when the SDK is not installed
/// on this kiosk.
pub trait SdkLoader: Send + Sync {
    fn load(&self) -> BoxFuture<'_, Result<Arc<dyn ScanSdk>, ScannerError>>;
}
