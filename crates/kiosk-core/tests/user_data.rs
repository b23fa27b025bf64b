use kiosk_core::models::{
    ClientModel, ConfirmedRecord, Gender, PersonalInfo, PersonalInfoPatch, ScanResult, UserData,
    UserDataPatch, Vitals,
};

fn jane() -> PersonalInfo {
    PersonalInfo {
        full_name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: String::new(),
        nationality_id: Some(1),
        consent: true,
        agree: true,
    }
}

#[test]
fn merged_fields_read_back_unchanged() {
    let mut data = UserData::default();
    data.merge(UserDataPatch::personal_info(jane()));

    assert_eq!(data.personal_info, jane());
}

#[test]
fn complaint_patch_keeps_personal_info() {
    let mut data = UserData::default();
    data.merge(UserDataPatch::personal_info(jane()));
    data.merge(UserDataPatch::complaint("Headache, Fever"));

    assert_eq!(data.complaint, "Headache, Fever");
    assert_eq!(data.personal_info, jane());
}

#[test]
fn nested_patch_only_touches_supplied_fields() {
    let mut data = UserData::default();
    data.merge(UserDataPatch::personal_info(jane()));
    data.merge(UserDataPatch {
        personal_info: Some(PersonalInfoPatch {
            phone: Some("+971500000000".to_string()),
            ..Default::default()
        }),
        age: Some(41),
        gender: Some(Gender::Female),
        ..Default::default()
    });

    assert_eq!(data.personal_info.full_name, "Jane Doe");
    assert_eq!(data.personal_info.phone, "+971500000000");
    assert_eq!(data.personal_info.nationality_id, Some(1));
    assert_eq!(data.age, 41);
    assert_eq!(data.gender, Some(Gender::Female));
}

#[test]
fn vitals_patch_does_not_clear_identity() {
    let mut data = UserData::default();
    data.merge(UserDataPatch {
        id: Some("42".to_string()),
        ..Default::default()
    });
    data.merge(UserDataPatch::vitals(Vitals {
        heart_rate: 72.0,
        ..Default::default()
    }));

    assert_eq!(data.id, "42");
    assert_eq!(data.vitals.heart_rate, 72.0);
}

#[test]
fn arabic_gender_labels_map_to_api_values() {
    assert_eq!(Gender::parse("ذكر"), Some(Gender::Male));
    assert_eq!(Gender::parse("أنثى"), Some(Gender::Female));
    assert_eq!(Gender::parse("Female"), Some(Gender::Female));
    assert_eq!(Gender::parse("unknown"), None);
}

#[test]
fn client_model_reads_pascal_case_with_loose_types() {
    let json = r#"{"Id": 17, "FullName": "Jane Doe", "NationalityId": 3, "Age": "29"}"#;
    let client: ClientModel = serde_json::from_str(json).unwrap();

    assert_eq!(client.id, "17");
    assert_eq!(client.full_name, "Jane Doe");
    assert_eq!(client.nationality_id, "3");
    assert_eq!(client.age, 29);
    assert_eq!(client.health_concern, "");
}

#[test]
fn synthesized_client_uses_defaults_for_missing_values() {
    let client = ClientModel::from_user_data(&UserData::default());

    assert_eq!(client.full_name, "");
    assert_eq!(client.nationality_id, "");
    assert_eq!(client.age, 0);
    assert_eq!(client.gender, "");
}

#[test]
fn client_merge_keeps_existing_values_for_empty_fields() {
    let mut cached = ClientModel {
        id: "9".to_string(),
        full_name: "Jane Doe".to_string(),
        ..Default::default()
    };
    cached.merge(ClientModel {
        health_concern: "Cough".to_string(),
        ..Default::default()
    });

    assert_eq!(cached.full_name, "Jane Doe");
    assert_eq!(cached.health_concern, "Cough");
}

#[test]
fn confirmed_record_requires_an_identifying_field() {
    assert!(ConfirmedRecord::new(ClientModel::default()).is_err());

    let confirmed = ConfirmedRecord::new(ClientModel {
        full_name: "Jane Doe".to_string(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(confirmed.record().full_name, "Jane Doe");
}

#[test]
fn scan_result_converts_to_vitals() {
    let json = r#"{
        "RealTimeHeartRate": 71.0,
        "HeartRate10s": 70.0,
        "SystolicBloodPressureMmhg": 118.0,
        "DiastolicBloodPressureMmhg": 76.0,
        "BreathingRate": 14.0,
        "HrvSdnnMs": 45.0
    }"#;
    let scan: ScanResult = serde_json::from_str(json).unwrap();
    let vitals = scan.to_vitals();

    assert_eq!(scan.heart_rate_10s, Some(70.0));
    assert_eq!(vitals.heart_rate, 71.0);
    assert_eq!(vitals.blood_pressure, "118/76");
    assert_eq!(vitals.oxygen_saturation, 0.0);
}
