use std::sync::Arc;

use jiff::Zoned;
use kiosk_api::Endpoint;
use kiosk_api::mock::{Failure, MockBackend};
use kiosk_core::complaint::ComplaintSelection;
use kiosk_core::models::{ClientModel, Gender, PersonalInfo, ScanResult};
use kiosk_core::validation::Field;
use kiosk_flow::steps;
use kiosk_flow::{FlowError, Relevance, Step, StepWizard};
use kiosk_storage::SessionRepository;

fn jane() -> PersonalInfo {
    PersonalInfo {
        full_name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        nationality_id: Some(1),
        consent: true,
        agree: true,
        ..Default::default()
    }
}

fn setup() -> (StepWizard, MockBackend, Arc<SessionRepository>, Relevance) {
    let repo = Arc::new(SessionRepository::in_memory());
    (
        StepWizard::new(repo.clone()),
        MockBackend::new(),
        repo,
        Relevance::new(),
    )
}

async fn registered() -> (StepWizard, MockBackend, Arc<SessionRepository>, Relevance) {
    let (mut wizard, backend, repo, relevance) = setup();
    steps::submit_personal_info(&mut wizard, &backend, &relevance, jane())
        .await
        .unwrap();
    (wizard, backend, repo, relevance)
}

#[tokio::test]
async fn personal_info_creates_client_and_advances() {
    let (mut wizard, backend, repo, relevance) = setup();

    let transition = steps::submit_personal_info(&mut wizard, &backend, &relevance, jane())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(transition.from, Step::PersonalInfo);
    assert_eq!(wizard.current(), Step::AgeGender);
    assert_eq!(wizard.snapshot().unwrap().full_name, "Jane Doe");
    assert_eq!(wizard.data().id, "42");
    assert_eq!(repo.client_id().as_deref(), Some("42"));

    let body = &backend.calls_to(Endpoint::AddOrUpdateClient)[0].body;
    assert_eq!(body["username"], "janedoe");
    assert_eq!(body["password"], "123456");
}

#[tokio::test]
async fn invalid_personal_info_never_reaches_backend() {
    let (mut wizard, backend, _, relevance) = setup();
    let info = PersonalInfo {
        email: "not-an-email".to_string(),
        consent: false,
        ..jane()
    };

    let err = steps::submit_personal_info(&mut wizard, &backend, &relevance, info)
        .await
        .unwrap_err();
    let FlowError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.get(Field::Email).is_some());
    assert!(errors.get(Field::Consent).is_some());
    assert!(backend.calls().is_empty());
    assert_eq!(wizard.current(), Step::PersonalInfo);
}

#[tokio::test]
async fn backend_failure_blocks_personal_info() {
    let (mut wizard, backend, repo, relevance) = setup();
    backend.fail(Endpoint::AddOrUpdateClient, Failure::Rejected);

    let err = steps::submit_personal_info(&mut wizard, &backend, &relevance, jane())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Api(_)));
    assert_eq!(wizard.current(), Step::PersonalInfo);
    assert!(wizard.snapshot().is_none());
    assert!(repo.client_id().is_none());
}

#[tokio::test]
async fn stale_screen_does_not_advance() {
    let (mut wizard, backend, _, relevance) = setup();
    relevance.revoke();

    let err = steps::submit_personal_info(&mut wizard, &backend, &relevance, jane())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Stale));
    assert_eq!(wizard.current(), Step::PersonalInfo);
}

#[tokio::test]
async fn age_gender_edits_client() {
    let (mut wizard, backend, _, relevance) = registered().await;

    steps::submit_age_gender(&mut wizard, &backend, &relevance, 31, Some(Gender::Female))
        .await
        .unwrap();

    assert_eq!(wizard.current(), Step::FaceScan);
    assert_eq!(wizard.data().age, 31);
    let body = &backend.calls_to(Endpoint::EditClient)[0].body;
    assert_eq!(body["id"], "42");
    assert_eq!(body["age"], "31");
    assert_eq!(body["gender"], "Female");
    assert_eq!(body["fullName"], "Jane Doe");
}

#[tokio::test]
async fn age_gender_requires_gender() {
    let (mut wizard, backend, _, relevance) = registered().await;

    let err = steps::submit_age_gender(&mut wizard, &backend, &relevance, 31, None)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Validation(_)));
    assert_eq!(backend.count(Endpoint::EditClient), 0);
}

#[tokio::test]
async fn age_gender_without_client_id_fails() {
    let (mut wizard, backend, _, relevance) = setup();

    let err = steps::submit_age_gender(&mut wizard, &backend, &relevance, 31, Some(Gender::Male))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::MissingClientId));
}

#[tokio::test]
async fn scan_results_pull_client_and_vitals() {
    let (mut wizard, backend, _, relevance) = registered().await;
    backend.set_scan_result(ScanResult {
        real_time_heart_rate: Some(72.0),
        systolic_blood_pressure_mmhg: Some(118.0),
        diastolic_blood_pressure_mmhg: Some(76.0),
        ..Default::default()
    });

    let scan = steps::load_scan_results(&mut wizard, &backend, &relevance)
        .await
        .unwrap();

    assert!(scan.is_some());
    assert_eq!(wizard.data().vitals.heart_rate, 72.0);
    assert_eq!(wizard.data().vitals.blood_pressure, "118/76");
    assert_eq!(wizard.data().personal_info.full_name, "Jane Doe");
}

#[tokio::test]
async fn complaint_is_cached_before_the_backend_call() {
    let (mut wizard, backend, repo, relevance) = registered().await;
    backend.fail(Endpoint::EditClientHealthConcern, Failure::Transport);

    let mut selection = ComplaintSelection::default();
    selection.toggle("headache");
    selection.toggle("other");
    selection.other_text = "  ringing ears ".to_string();

    let err = steps::submit_complaint(&mut wizard, &backend, &relevance, &selection)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Api(_)));
    assert_eq!(wizard.current(), Step::AgeGender);
    assert_eq!(
        repo.snapshot().unwrap().health_concern,
        "Headache, ringing ears"
    );

    backend.recover(Endpoint::EditClientHealthConcern);
    steps::submit_complaint(&mut wizard, &backend, &relevance, &selection)
        .await
        .unwrap();
    assert_eq!(backend.client().unwrap().health_concern, "Headache, ringing ears");
}

#[tokio::test]
async fn summary_survives_missing_scan() {
    let (mut wizard, backend, _, relevance) = registered().await;
    backend.fail(Endpoint::LatestScanResult, Failure::Transport);

    let summary = steps::health_summary(&mut wizard, &backend, &relevance)
        .await
        .unwrap();
    assert!(summary.vitals.is_empty());
    assert_eq!(summary.display_name(), "Jane Doe");
}

#[tokio::test]
async fn email_clears_snapshot_only_on_success() {
    let (mut wizard, backend, repo, relevance) = registered().await;
    let summary = steps::health_summary(&mut wizard, &backend, &relevance)
        .await
        .unwrap();
    let at: Zoned = "2026-03-01T09:05:00+00:00[+00:00]".parse().unwrap();

    backend.fail(Endpoint::SendMedicalReport, Failure::Rejected);
    assert!(
        steps::send_summary_email(&mut wizard, &backend, &summary, &at)
            .await
            .is_err()
    );
    assert!(repo.snapshot().is_some());

    backend.recover(Endpoint::SendMedicalReport);
    steps::send_summary_email(&mut wizard, &backend, &summary, &at)
        .await
        .unwrap();
    assert!(repo.snapshot().is_none());
    assert!(wizard.snapshot().is_none());

    let body = &backend.calls_to(Endpoint::SendMedicalReport)[1].body;
    assert_eq!(body["receiver"], "jane@x.com");
    assert_eq!(body["subject"], steps::REPORT_SUBJECT);
    assert_eq!(body["reportData"]["date"], "2026-03-01");
    assert_eq!(body["reportData"]["time"], "09:05");
}

#[tokio::test]
async fn email_needs_an_address() {
    let (mut wizard, backend, _, _) = setup();
    let summary = kiosk_flow::HealthSummary::build(ClientModel::default(), None);
    let at = Zoned::now();

    let err = steps::send_summary_email(&mut wizard, &backend, &summary, &at)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::MissingEmail));
    assert!(backend.calls().is_empty());
}
