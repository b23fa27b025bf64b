//! The single read/write contract for everything a kiosk session persists.
//!
//! Three scopes sit behind the repository:
//! - the client id, which expires after a day,
//! - the session scope (client snapshot), wiped at the start of each session
//!   and after the summary e-mail is sent,
//! - the durable local scope (questionnaire results), which survives failed
//!   backend saves and process restarts.
//!
//! Reads never fail: a missing, expired, or unreadable value is logged and
//! reported as absent. Writes return their error so callers can decide
//! whether it matters.

use std::path::Path;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use kiosk_core::models::{ClientModel, QuestionnaireAnswer, RiskLevel};
use kiosk_core::storage_keys;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::StorageError;
use crate::state;
use crate::store::{FileStore, KeyValueStore, MemoryStore};

/// How long a client id stays valid.
pub const CLIENT_ID_TTL: SignedDuration = SignedDuration::from_hours(24);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExpiringValue {
    value: String,
    expires_at: Timestamp,
}

/// One condition's questionnaire result, persisted locally as soon as the
/// questionnaire completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionnaireRecord {
    pub client_id: String,
    pub session_id: Uuid,
    pub arrhythmia_name: String,
    pub questionnaire_risk_level: RiskLevel,
    pub questionnaire_score: i32,
    pub answers: Vec<QuestionnaireAnswer>,
    pub saved_at: Timestamp,
}

pub struct SessionRepository {
    cookies: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    local: Arc<dyn KeyValueStore>,
}

impl SessionRepository {
    pub fn new(
        cookies: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        local: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            cookies,
            session,
            local,
        }
    }

    /// Everything in memory. Used by tests and by kiosks without a data dir.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )
    }

    /// Persist under `data_dir/{cookies,session,local}`.
    pub fn on_disk(data_dir: &Path) -> Result<Self, StorageError> {
        Ok(Self::new(
            Arc::new(FileStore::open(data_dir.join("cookies"))?),
            Arc::new(FileStore::open(data_dir.join("session"))?),
            Arc::new(FileStore::open(data_dir.join("local"))?),
        ))
    }

    /// Start a fresh kiosk session: drop whatever the previous visitor left
    /// in the session scope. The local scope is kept.
    pub fn begin_session(&self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "failed to clear session scope");
        }
        if let Err(e) = self.cookies.remove(storage_keys::CLIENT_ID) {
            tracing::warn!(error = %e, "failed to clear client id");
        }
    }

    fn read<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
        match state::load_json(store, key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value, ignoring it");
                None
            }
        }
    }

    // ── Client id ────────────────────────────────────────────────────────

    pub fn client_id(&self) -> Option<String> {
        self.client_id_at(Timestamp::now())
    }

    /// The client id as seen at `now`. Expired ids are removed.
    pub fn client_id_at(&self, now: Timestamp) -> Option<String> {
        let stored: ExpiringValue = Self::read(self.cookies.as_ref(), storage_keys::CLIENT_ID)?;
        if stored.expires_at <= now {
            tracing::debug!("client id expired");
            if let Err(e) = self.cookies.remove(storage_keys::CLIENT_ID) {
                tracing::warn!(error = %e, "failed to remove expired client id");
            }
            return None;
        }
        Some(stored.value)
    }

    pub fn set_client_id(&self, id: &str) -> Result<(), StorageError> {
        self.set_client_id_until(id, Timestamp::now() + CLIENT_ID_TTL)
    }

    pub fn set_client_id_until(&self, id: &str, expires_at: Timestamp) -> Result<(), StorageError> {
        let value = ExpiringValue {
            value: id.to_string(),
            expires_at,
        };
        state::save_json(self.cookies.as_ref(), storage_keys::CLIENT_ID, &value)
    }

    // ── Client snapshot ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> Option<ClientModel> {
        Self::read(self.session.as_ref(), storage_keys::CLIENT_SNAPSHOT)
    }

    pub fn save_snapshot(&self, client: &ClientModel) -> Result<(), StorageError> {
        state::save_json(self.session.as_ref(), storage_keys::CLIENT_SNAPSHOT, client)
    }

    pub fn clear_snapshot(&self) -> Result<(), StorageError> {
        self.session.remove(storage_keys::CLIENT_SNAPSHOT)
    }

    // ── Questionnaire fallback ───────────────────────────────────────────

    /// Persist one condition's result under its own key and replace that
    /// condition's entry in the client's master index.
    pub fn save_questionnaire(&self, record: &QuestionnaireRecord) -> Result<(), StorageError> {
        let key =
            storage_keys::questionnaire_fallback(&record.client_id, &record.arrhythmia_name);
        state::save_json(self.local.as_ref(), &key, record)?;

        let index_key = storage_keys::questionnaire_index(&record.client_id);
        let mut index: Vec<QuestionnaireRecord> =
            Self::read(self.local.as_ref(), &index_key).unwrap_or_default();
        index.retain(|r| r.arrhythmia_name != record.arrhythmia_name);
        index.push(record.clone());
        state::save_json(self.local.as_ref(), &index_key, &index)?;

        tracing::debug!(
            client_id = %record.client_id,
            condition = %record.arrhythmia_name,
            "questionnaire saved locally"
        );
        Ok(())
    }

    pub fn questionnaire(&self, client_id: &str, condition: &str) -> Option<QuestionnaireRecord> {
        Self::read(
            self.local.as_ref(),
            &storage_keys::questionnaire_fallback(client_id, condition),
        )
    }

    /// Every locally persisted result for a client, in save order.
    pub fn questionnaires(&self, client_id: &str) -> Vec<QuestionnaireRecord> {
        Self::read(
            self.local.as_ref(),
            &storage_keys::questionnaire_index(client_id),
        )
        .unwrap_or_default()
    }
}
