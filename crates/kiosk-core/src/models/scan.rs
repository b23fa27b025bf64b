use serde::{Deserialize, Serialize};

use super::user_data::Vitals;

/// Latest face-scan result, as returned by
/// `GET /ScanResult/GetClientLatestScanResult`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScanResult {
    pub heart_rate_10s: Option<f64>,
    pub heart_rate_4s: Option<f64>,
    pub real_time_heart_rate: Option<f64>,
    pub hrv_sdnn_ms: Option<f64>,
    pub breathing_rate: Option<f64>,
    pub cardiac_stress: Option<f64>,
    pub systolic_blood_pressure_mmhg: Option<f64>,
    pub diastolic_blood_pressure_mmhg: Option<f64>,
}

impl ScanResult {
    /// Session vitals for this scan. The scanner does not measure oxygen
    /// saturation or temperature, so both stay at zero.
    pub fn to_vitals(&self) -> Vitals {
        let systolic = self.systolic_blood_pressure_mmhg.unwrap_or_default();
        let diastolic = self.diastolic_blood_pressure_mmhg.unwrap_or_default();
        Vitals {
            heart_rate: self.real_time_heart_rate.unwrap_or_default(),
            blood_pressure: format!("{systolic}/{diastolic}"),
            breathing_rate: self.breathing_rate.unwrap_or_default(),
            hrv_sdnn_ms: self.hrv_sdnn_ms.unwrap_or_default(),
            systolic_bp: systolic,
            diastolic_bp: diastolic,
            oxygen_saturation: 0.0,
            temperature: 0.0,
        }
    }
}
