//! Health summary: vital signs against normal ranges, reported symptoms,
//! and the e-mail report payload. Pure data, no I/O.

use jiff::Zoned;
use kiosk_api::requests::MedicalReport;
use kiosk_core::complaint;
use kiosk_core::models::{ClientModel, ScanResult};

/// Seconds the summary stays up before the kiosk resets for the next
/// visitor.
pub const SUMMARY_TIMEOUT_SECS: u64 = 30;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalStatus {
    Normal,
    Abnormal,
    /// The scan produced no value.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vital {
    HeartRate,
    BloodPressure,
    HeartRateVariability,
    RespirationRate,
}

impl Vital {
    pub fn unit(self) -> &'static str {
        match self {
            Self::HeartRate => "bpm",
            Self::BloodPressure => "mmHg",
            Self::HeartRateVariability => "ms",
            Self::RespirationRate => "breaths/min",
        }
    }

    pub fn normal_range(self) -> &'static str {
        match self {
            Self::HeartRate => "60-100",
            Self::BloodPressure => "<120/<80",
            Self::HeartRateVariability => "20-100",
            Self::RespirationRate => "12-20",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VitalReading {
    pub vital: Vital,
    /// Display value without unit; `"N/A"` when missing.
    pub value: String,
    pub status: VitalStatus,
}

fn in_range(value: Option<f64>, low: f64, high: f64) -> VitalStatus {
    match value {
        Some(v) if v >= low && v <= high => VitalStatus::Normal,
        Some(_) => VitalStatus::Abnormal,
        None => VitalStatus::Unknown,
    }
}

pub fn heart_rate_status(bpm: Option<f64>) -> VitalStatus {
    in_range(bpm, 60.0, 100.0)
}

pub fn hrv_status(sdnn_ms: Option<f64>) -> VitalStatus {
    in_range(sdnn_ms, 20.0, 100.0)
}

pub fn respiration_status(breaths_per_min: Option<f64>) -> VitalStatus {
    in_range(breaths_per_min, 12.0, 20.0)
}

/// Normal only when both readings are below 120/80.
pub fn blood_pressure_status(systolic: Option<f64>, diastolic: Option<f64>) -> VitalStatus {
    match (systolic, diastolic) {
        (Some(s), Some(d)) if s < 120.0 && d < 80.0 => VitalStatus::Normal,
        (None, None) => VitalStatus::Unknown,
        _ => VitalStatus::Abnormal,
    }
}

fn display(value: Option<f64>) -> String {
    match value {
        // Zero means "not measured" on the backend.
        Some(v) if v != 0.0 => format!("{}", (v * 10.0).round() / 10.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthSummary {
    pub client: ClientModel,
    pub scan: Option<ScanResult>,
    pub vitals: Vec<VitalReading>,
    pub symptoms: Vec<String>,
}

impl HealthSummary {
    pub fn build(client: ClientModel, scan: Option<ScanResult>) -> Self {
        let vitals = scan.as_ref().map(vital_readings).unwrap_or_default();
        let symptoms = complaint::split_symptoms(&client.health_concern);
        Self {
            client,
            scan,
            vitals,
            symptoms,
        }
    }

    /// Full name, then username, then `"N/A"`.
    pub fn display_name(&self) -> &str {
        [&self.client.full_name, &self.client.user_name]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(NOT_AVAILABLE)
    }

    /// Payload for `POST /email/SendMedicalReport`.
    pub fn report(&self, at: &Zoned) -> MedicalReport {
        let scan = self.scan.clone().unwrap_or_default();
        let blood_pressure = match &self.scan {
            Some(s) => format!(
                "{}/{}",
                display(s.systolic_blood_pressure_mmhg),
                display(s.diastolic_blood_pressure_mmhg)
            ),
            None => NOT_AVAILABLE.to_string(),
        };
        let or_na = |s: &str| {
            if s.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                s.to_string()
            }
        };

        MedicalReport {
            date: at.strftime("%Y-%m-%d").to_string(),
            time: at.strftime("%H:%M").to_string(),
            name: self.display_name().to_string(),
            age: if self.client.age == 0 {
                NOT_AVAILABLE.to_string()
            } else {
                self.client.age.to_string()
            },
            gender: or_na(&self.client.gender),
            heart_rate: display(scan.heart_rate_10s),
            blood_pressure,
            heart_rate_variability: display(scan.hrv_sdnn_ms),
            respiration_rate: display(scan.breathing_rate),
            reported_symptoms: if self.symptoms.is_empty() {
                "No symptoms reported".to_string()
            } else {
                self.symptoms.join(", ")
            },
        }
    }
}

fn vital_readings(scan: &ScanResult) -> Vec<VitalReading> {
    vec![
        VitalReading {
            vital: Vital::HeartRate,
            value: display(scan.heart_rate_10s),
            status: heart_rate_status(scan.heart_rate_10s),
        },
        VitalReading {
            vital: Vital::BloodPressure,
            value: format!(
                "{}/{}",
                display(scan.systolic_blood_pressure_mmhg),
                display(scan.diastolic_blood_pressure_mmhg)
            ),
            status: blood_pressure_status(
                scan.systolic_blood_pressure_mmhg,
                scan.diastolic_blood_pressure_mmhg,
            ),
        },
        VitalReading {
            vital: Vital::HeartRateVariability,
            value: display(scan.hrv_sdnn_ms),
            status: hrv_status(scan.hrv_sdnn_ms),
        },
        VitalReading {
            vital: Vital::RespirationRate,
            value: display(scan.breathing_rate),
            status: respiration_status(scan.breathing_rate),
        },
    ]
}
