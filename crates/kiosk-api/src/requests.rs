//! Request bodies. Field names follow the backend's camelCase contract.

use jiff::Timestamp;
use kiosk_core::models::{ConditionWithQuestionnaire, Gender, UserData};
use serde::{Deserialize, Serialize};

/// The backend requires a password on every client record; kiosk visitors
/// never log in, so a fixed value is sent.
pub const KIOSK_CLIENT_PASSWORD: &str = "123456";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOrUpdateClientRequest {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub nationality_id: Option<u32>,
}

impl AddOrUpdateClientRequest {
    pub fn from_user_data(data: &UserData) -> Self {
        let info = &data.personal_info;
        Self {
            full_name: info.full_name.clone(),
            username: info.username(),
            email: info.email.clone(),
            phone: info.phone.clone(),
            password: KIOSK_CLIENT_PASSWORD.to_string(),
            nationality_id: info.nationality_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditClientRequest {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub nationality_id: Option<u32>,
    /// Sent as a string; `"0"` when unknown.
    pub age: String,
    pub gender: Option<Gender>,
}

impl EditClientRequest {
    pub fn from_user_data(id: &str, data: &UserData) -> Self {
        let info = &data.personal_info;
        Self {
            id: id.to_string(),
            full_name: info.full_name.clone(),
            username: info.username(),
            email: info.email.clone(),
            phone: info.phone.clone(),
            nationality_id: info.nationality_id,
            age: data.age.to_string(),
            gender: data.gender,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditHealthConcernRequest {
    pub id: String,
    pub health_concern: String,
}

/// Raw scanner readings for one measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddScanResultRequest {
    pub client_id: String,
    pub heart_rate_10s: Option<f64>,
    pub heart_rate_4s: Option<f64>,
    pub realtime_heart_rate: Option<f64>,
    pub hrv_sdnn: Option<f64>,
    pub cardiac_stress: Option<f64>,
    pub systolic_blood_pressure: Option<f64>,
    pub diastolic_blood_pressure: Option<f64>,
    pub health_risks: serde_json::Value,
    pub breathing_rate: Option<f64>,
    pub hrv_sdnn_ms: Option<f64>,
    pub systolic_blood_pressure_mmhg: Option<f64>,
    pub diastolic_blood_pressure_mmhg: Option<f64>,
    /// Beat-to-beat intervals in milliseconds.
    pub heart_rate_intervals: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddArrhythmiaRequest {
    pub client_id: String,
    /// One interval series per recording. The kiosk always sends one.
    pub inputs: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAnswer {
    pub arrhythmia_result_id: i64,
    pub index: usize,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCondition {
    pub id: i64,
    pub creation_time: Timestamp,
    pub arrhythmia_name: String,
    pub arrhythmia_short_name: String,
    pub confidence: f64,
    pub detected: bool,
    /// 0 = None, 1 = Suspected, 2 = HighRisk.
    pub initial_risk_level: u8,
    pub questionnaire_risk_level: u8,
    pub questionnaire_score: i32,
    pub answers: Vec<BulkAnswer>,
}

/// Body of the single end-of-assessment save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkQuestionnaireRequest {
    pub conditions: Vec<BulkCondition>,
}

impl BulkQuestionnaireRequest {
    /// Every condition that has answers, stamped with `now`.
    pub fn from_conditions(conditions: &[ConditionWithQuestionnaire], now: Timestamp) -> Self {
        let conditions = conditions
            .iter()
            .filter(|c| c.is_completed())
            .map(|c| BulkCondition {
                id: c.id,
                creation_time: now,
                arrhythmia_name: c.arrhythmia_name.clone(),
                arrhythmia_short_name: c.arrhythmia_name.clone(),
                confidence: c.confidence,
                // A condition that reached a questionnaire counts as detected
                // unless the backend said otherwise.
                detected: c.is_detected.unwrap_or(true),
                initial_risk_level: c.initial_risk_level.code(),
                questionnaire_risk_level: c.questionnaire_risk_level.unwrap_or_default().code(),
                questionnaire_score: c.questionnaire_score.unwrap_or_default(),
                answers: c
                    .answers
                    .iter()
                    .map(|a| BulkAnswer {
                        arrhythmia_result_id: a.arrhythmia_result_id,
                        index: a.index,
                        answer: a.answer.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self { conditions }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Report values as printed in the e-mail. Unknown values are `"N/A"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReport {
    pub date: String,
    pub time: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub heart_rate: String,
    pub blood_pressure: String,
    pub heart_rate_variability: String,
    pub respiration_rate: String,
    pub reported_symptoms: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReportRequest {
    pub receiver: String,
    pub subject: String,
    pub report_data: MedicalReport,
}
