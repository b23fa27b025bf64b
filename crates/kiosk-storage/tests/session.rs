use jiff::{SignedDuration, Timestamp};
use kiosk_core::models::{ClientModel, QuestionnaireAnswer, RiskLevel};
use kiosk_storage::{FileStore, KeyValueStore, MemoryStore, QuestionnaireRecord, SessionRepository, StorageError};
use uuid::Uuid;

fn record(client: &str, condition: &str, score: i32) -> QuestionnaireRecord {
    QuestionnaireRecord {
        client_id: client.to_string(),
        session_id: Uuid::new_v4(),
        arrhythmia_name: condition.to_string(),
        questionnaire_risk_level: RiskLevel::HighRisk,
        questionnaire_score: score,
        answers: vec![QuestionnaireAnswer {
            arrhythmia_result_id: 0,
            index: 0,
            answer: "Yes".to_string(),
        }],
        saved_at: Timestamp::now(),
    }
}

#[test]
fn client_id_expires_after_deadline() {
    let repo = SessionRepository::in_memory();
    let now = Timestamp::now();
    repo.set_client_id_until("42", now + SignedDuration::from_hours(1))
        .unwrap();

    assert_eq!(repo.client_id_at(now).as_deref(), Some("42"));
    assert_eq!(repo.client_id_at(now + SignedDuration::from_hours(2)), None);
    // Expired ids are removed, not just hidden.
    assert_eq!(repo.client_id_at(now), None);
}

#[test]
fn fresh_client_id_is_valid_for_a_day() {
    let repo = SessionRepository::in_memory();
    repo.set_client_id("7").unwrap();

    let almost = Timestamp::now() + SignedDuration::from_hours(23);
    assert_eq!(repo.client_id_at(almost).as_deref(), Some("7"));
}

#[test]
fn snapshot_round_trips_and_clears() {
    let repo = SessionRepository::in_memory();
    assert!(repo.snapshot().is_none());

    let client = ClientModel {
        id: "42".to_string(),
        full_name: "Jane Doe".to_string(),
        ..Default::default()
    };
    repo.save_snapshot(&client).unwrap();
    assert_eq!(repo.snapshot().unwrap().full_name, "Jane Doe");

    repo.clear_snapshot().unwrap();
    assert!(repo.snapshot().is_none());
}

#[test]
fn unreadable_snapshot_degrades_to_none() {
    let session = std::sync::Arc::new(MemoryStore::new());
    session.set("clientData", "{ not json").unwrap();
    let repo = SessionRepository::new(
        std::sync::Arc::new(MemoryStore::new()),
        session,
        std::sync::Arc::new(MemoryStore::new()),
    );

    assert!(repo.snapshot().is_none());
}

#[test]
fn master_index_keeps_one_entry_per_condition() {
    let repo = SessionRepository::in_memory();
    repo.save_questionnaire(&record("42", "AFib", 3)).unwrap();
    repo.save_questionnaire(&record("42", "PVC", 1)).unwrap();
    repo.save_questionnaire(&record("42", "AFib", 6)).unwrap();

    let all = repo.questionnaires("42");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].arrhythmia_name, "PVC");
    assert_eq!(all[1].arrhythmia_name, "AFib");
    assert_eq!(all[1].questionnaire_score, 6);

    let afib = repo.questionnaire("42", "AFib").unwrap();
    assert_eq!(afib.questionnaire_score, 6);
    assert!(repo.questionnaires("other").is_empty());
}

#[test]
fn begin_session_keeps_local_results() {
    let repo = SessionRepository::in_memory();
    repo.set_client_id("42").unwrap();
    repo.save_snapshot(&ClientModel::default()).unwrap();
    repo.save_questionnaire(&record("42", "AFib", 3)).unwrap();

    repo.begin_session();

    assert!(repo.client_id().is_none());
    assert!(repo.snapshot().is_none());
    assert_eq!(repo.questionnaires("42").len(), 1);
}

#[test]
fn on_disk_repository_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let repo = SessionRepository::on_disk(dir.path()).unwrap();
        repo.set_client_id("42").unwrap();
        repo.save_questionnaire(&record("42", "AFib", 6)).unwrap();
    }

    let repo = SessionRepository::on_disk(dir.path()).unwrap();
    assert_eq!(repo.client_id().as_deref(), Some("42"));
    assert_eq!(repo.questionnaire("42", "AFib").unwrap().questionnaire_score, 6);
}

#[test]
fn file_store_keeps_path_like_keys_inside_its_dir() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("store")).unwrap();

    let keys = ["../escape", "a/b", "a\\b", ".hidden", "a%2Fb"];
    for (i, key) in keys.iter().enumerate() {
        store.set(key, &i.to_string()).unwrap();
    }
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(store.get(key).unwrap(), Some(i.to_string()));
    }

    assert!(!dir.path().join("escape.json").exists());
    let files = std::fs::read_dir(dir.path().join("store")).unwrap().count();
    assert_eq!(files, keys.len());

    assert!(matches!(store.set("", "x"), Err(StorageError::InvalidKey(_))));
}

#[test]
fn condition_names_with_slashes_are_kept_locally() {
    let dir = tempfile::tempdir().unwrap();
    let repo = SessionRepository::on_disk(dir.path()).unwrap();

    repo.save_questionnaire(&record("42", "AV Block 2/3", 4)).unwrap();

    let stored = repo.questionnaire("42", "AV Block 2/3").unwrap();
    assert_eq!(stored.questionnaire_score, 4);
    assert_eq!(repo.questionnaires("42").len(), 1);
}

#[test]
fn file_store_clear_and_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("nested")).unwrap();

    assert_eq!(store.get("missing").unwrap(), None);
    store.remove("missing").unwrap();

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

    store.clear().unwrap();
    assert_eq!(store.get("a").unwrap(), None);
    assert_eq!(store.get("b").unwrap(), None);
}

#[cfg(unix)]
#[test]
fn file_store_values_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store.set("userId", "42").unwrap();

    let mode = std::fs::metadata(dir.path().join("userId.json"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}
