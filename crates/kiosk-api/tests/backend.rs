use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::Duration;

use jiff::Timestamp;
use kiosk_api::mock::{Failure, MockBackend};
use kiosk_api::requests::{BulkQuestionnaireRequest, EditHealthConcernRequest};
use kiosk_api::{ApiError, Backend, Endpoint, Envelope, HttpBackend};
use kiosk_core::models::{ClientModel, ConditionWithQuestionnaire, QuestionnaireAnswer, RiskLevel};

/// Serve one canned HTTP response on a local port and return the base URL.
fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
    });
    format!("http://{addr}/")
}

#[test]
fn envelope_false_is_failure_even_with_result() {
    let envelope: Envelope<i32> =
        serde_json::from_str(r#"{ "IsSuccess": false, "Result": 5 }"#).unwrap();
    assert!(matches!(
        envelope.into_result(Endpoint::GetClient),
        Err(ApiError::Rejected { endpoint: Endpoint::GetClient })
    ));
}

#[test]
fn envelope_success_without_result() {
    let envelope: Envelope<i32> = serde_json::from_str(r#"{ "IsSuccess": true }"#).unwrap();
    assert!(matches!(
        envelope.clone().into_result(Endpoint::GetClient),
        Err(ApiError::MissingResult { .. })
    ));
    assert_eq!(envelope.into_optional(Endpoint::GetClient).unwrap(), None);
}

#[test]
fn bulk_request_only_carries_completed_conditions() {
    let mut afib = ConditionWithQuestionnaire::new("AFib", RiskLevel::HighRisk);
    afib.id = 11;
    afib.apply_result(
        vec![QuestionnaireAnswer {
            arrhythmia_result_id: 0,
            index: 0,
            answer: "Yes".to_string(),
        }],
        6,
        RiskLevel::HighRisk,
    );
    let pvc = ConditionWithQuestionnaire::new("PVC", RiskLevel::Suspected);

    let req = BulkQuestionnaireRequest::from_conditions(&[afib, pvc], Timestamp::UNIX_EPOCH);
    assert_eq!(req.conditions.len(), 1);

    let json = serde_json::to_value(&req).unwrap();
    let first = &json["conditions"][0];
    assert_eq!(first["id"], 11);
    assert_eq!(first["arrhythmiaName"], "AFib");
    assert_eq!(first["initialRiskLevel"], 2);
    assert_eq!(first["questionnaireRiskLevel"], 2);
    assert_eq!(first["questionnaireScore"], 6);
    assert_eq!(first["detected"], true);
    assert_eq!(first["answers"][0]["answer"], "Yes");
    assert_eq!(first["answers"][0]["arrhythmiaResultId"], 0);
}

#[tokio::test]
async fn http_backend_unwraps_envelope() {
    let url = serve_once(
        "200 OK",
        r#"{ "IsSuccess": true, "Result": { "Id": 42, "FullName": "Jane Doe", "Age": "31" } }"#,
    );
    let backend = HttpBackend::new(url, Duration::from_secs(5));

    let client = backend.get_client("42").await.unwrap();
    assert_eq!(client.id, "42");
    assert_eq!(client.full_name, "Jane Doe");
    assert_eq!(client.age, 31);
}

#[tokio::test]
async fn http_backend_treats_is_success_false_as_error() {
    let url = serve_once("200 OK", r#"{ "IsSuccess": false, "Result": null }"#);
    let backend = HttpBackend::new(url, Duration::from_secs(5));

    let err = backend.arrhythmia_requests("42").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { endpoint: Endpoint::ArrhythmiaRequests }));
}

#[tokio::test]
async fn http_backend_maps_status_codes() {
    let url = serve_once("500 Internal Server Error", "{}");
    let backend = HttpBackend::new(url, Duration::from_secs(5));

    let err = backend.latest_scan_result("42").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert_eq!(err.endpoint(), Some(Endpoint::LatestScanResult));
}

#[tokio::test]
async fn mock_records_calls_and_scripts_failures() {
    let backend = MockBackend::new();
    backend.set_client(ClientModel {
        id: "42".to_string(),
        ..Default::default()
    });

    let req = EditHealthConcernRequest {
        id: "42".to_string(),
        health_concern: "headache".to_string(),
    };
    backend.edit_health_concern(&req).await.unwrap();
    assert_eq!(backend.client().unwrap().health_concern, "headache");

    backend.fail(Endpoint::EditClientHealthConcern, Failure::Rejected);
    assert!(matches!(
        backend.edit_health_concern(&req).await,
        Err(ApiError::Rejected { .. })
    ));

    backend.fail(Endpoint::EditClientHealthConcern, Failure::Transport);
    assert!(matches!(
        backend.edit_health_concern(&req).await,
        Err(ApiError::Transport { .. })
    ));

    let calls = backend.calls_to(Endpoint::EditClientHealthConcern);
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].body["healthConcern"], "headache");
}

#[tokio::test]
async fn mock_get_client_only_knows_its_own_client() {
    let backend = MockBackend::new();
    assert!(backend.get_client("42").await.is_err());

    backend.set_client(ClientModel {
        id: "42".to_string(),
        full_name: "Jane Doe".to_string(),
        ..Default::default()
    });
    assert_eq!(backend.get_client("42").await.unwrap().full_name, "Jane Doe");
    assert!(backend.get_client("7").await.is_err());
}
