use jiff::Zoned;
use kiosk_core::models::{ClientModel, ScanResult};
use kiosk_flow::summary::{
    Vital, blood_pressure_status, heart_rate_status, hrv_status, respiration_status,
};
use kiosk_flow::{HealthSummary, VitalStatus};

#[test]
fn heart_rate_range_is_inclusive() {
    assert_eq!(heart_rate_status(Some(60.0)), VitalStatus::Normal);
    assert_eq!(heart_rate_status(Some(100.0)), VitalStatus::Normal);
    assert_eq!(heart_rate_status(Some(101.0)), VitalStatus::Abnormal);
    assert_eq!(heart_rate_status(Some(59.9)), VitalStatus::Abnormal);
    assert_eq!(heart_rate_status(None), VitalStatus::Unknown);
}

#[test]
fn other_ranges() {
    assert_eq!(hrv_status(Some(20.0)), VitalStatus::Normal);
    assert_eq!(hrv_status(Some(120.0)), VitalStatus::Abnormal);
    assert_eq!(respiration_status(Some(12.0)), VitalStatus::Normal);
    assert_eq!(respiration_status(Some(21.0)), VitalStatus::Abnormal);
}

#[test]
fn blood_pressure_needs_both_below_limits() {
    assert_eq!(blood_pressure_status(Some(119.0), Some(79.0)), VitalStatus::Normal);
    assert_eq!(blood_pressure_status(Some(120.0), Some(70.0)), VitalStatus::Abnormal);
    assert_eq!(blood_pressure_status(Some(110.0), Some(80.0)), VitalStatus::Abnormal);
    assert_eq!(blood_pressure_status(Some(110.0), None), VitalStatus::Abnormal);
    assert_eq!(blood_pressure_status(None, None), VitalStatus::Unknown);
}

#[test]
fn symptoms_split_on_separators() {
    let client = ClientModel {
        health_concern: "Headache, Fever; cough and nothing".to_string(),
        ..Default::default()
    };
    let summary = HealthSummary::build(client, None);
    assert_eq!(summary.symptoms, ["Headache", "Fever", "cough"]);
}

#[test]
fn readings_cover_every_vital() {
    let scan = ScanResult {
        heart_rate_10s: Some(72.46),
        hrv_sdnn_ms: Some(0.0),
        breathing_rate: Some(16.0),
        systolic_blood_pressure_mmhg: Some(118.0),
        diastolic_blood_pressure_mmhg: Some(76.0),
        ..Default::default()
    };
    let summary = HealthSummary::build(ClientModel::default(), Some(scan));

    let vitals: Vec<_> = summary.vitals.iter().map(|r| r.vital).collect();
    assert_eq!(
        vitals,
        [
            Vital::HeartRate,
            Vital::BloodPressure,
            Vital::HeartRateVariability,
            Vital::RespirationRate
        ]
    );
    assert_eq!(summary.vitals[0].value, "72.5");
    assert_eq!(summary.vitals[1].value, "118/76");
    assert_eq!(summary.vitals[1].status, VitalStatus::Normal);
    assert_eq!(summary.vitals[2].value, "N/A");
}

#[test]
fn report_fills_gaps_with_placeholders() {
    let client = ClientModel {
        user_name: "janedoe".to_string(),
        ..Default::default()
    };
    let summary = HealthSummary::build(client, None);
    let at: Zoned = "2026-03-01T18:40:00+00:00[+00:00]".parse().unwrap();
    let report = summary.report(&at);

    assert_eq!(report.name, "janedoe");
    assert_eq!(report.age, "N/A");
    assert_eq!(report.gender, "N/A");
    assert_eq!(report.heart_rate, "N/A");
    assert_eq!(report.blood_pressure, "N/A");
    assert_eq!(report.reported_symptoms, "No symptoms reported");
    assert_eq!(report.time, "18:40");
}

#[test]
fn report_lists_symptoms_and_vitals() {
    let client = ClientModel {
        full_name: "Jane Doe".to_string(),
        age: 31,
        gender: "Female".to_string(),
        health_concern: "Headache, Fever".to_string(),
        ..Default::default()
    };
    let scan = ScanResult {
        heart_rate_10s: Some(88.0),
        systolic_blood_pressure_mmhg: Some(130.0),
        diastolic_blood_pressure_mmhg: Some(85.0),
        ..Default::default()
    };
    let at: Zoned = "2026-03-01T09:05:00+00:00[+00:00]".parse().unwrap();
    let report = HealthSummary::build(client, Some(scan)).report(&at);

    assert_eq!(report.name, "Jane Doe");
    assert_eq!(report.age, "31");
    assert_eq!(report.heart_rate, "88");
    assert_eq!(report.blood_pressure, "130/85");
    assert_eq!(report.respiration_rate, "N/A");
    assert_eq!(report.reported_symptoms, "Headache, Fever");
}
