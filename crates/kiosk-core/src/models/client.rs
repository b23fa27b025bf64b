use serde::{Deserialize, Serialize};

use super::lenient;
use super::user_data::UserData;
use crate::error::CoreError;

/// Server-shaped client record, as returned by `GET /client/GetClient`.
///
/// Every field defaults so a partially populated snapshot (e.g. one that
/// only carries `HealthConcern`) still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClientModel {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    pub full_name: String,
    pub user_name: String,
    pub email: String,
    pub phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub nationality_id: String,
    #[serde(deserialize_with = "lenient::u32")]
    pub age: u32,
    pub gender: String,
    pub health_concern: String,
}

impl ClientModel {
    /// Synthesize a record from session data. Missing values become empty
    /// strings or zero so the summary never shows a hole.
    pub fn from_user_data(data: &UserData) -> Self {
        let info = &data.personal_info;
        Self {
            id: data.id.clone(),
            full_name: info.full_name.clone(),
            user_name: info.username(),
            email: info.email.clone(),
            phone: info.phone.clone(),
            nationality_id: info
                .nationality_id
                .map(|n| n.to_string())
                .unwrap_or_default(),
            age: data.age,
            gender: data
                .gender
                .map(|g| g.as_str().to_string())
                .unwrap_or_default(),
            health_concern: data.complaint.clone(),
        }
    }

    /// Overlay every non-empty field of `other` onto `self`.
    pub fn merge(&mut self, other: ClientModel) {
        fn overlay(slot: &mut String, value: String) {
            if !value.is_empty() {
                *slot = value;
            }
        }
        overlay(&mut self.id, other.id);
        overlay(&mut self.full_name, other.full_name);
        overlay(&mut self.user_name, other.user_name);
        overlay(&mut self.email, other.email);
        overlay(&mut self.phone, other.phone);
        overlay(&mut self.nationality_id, other.nationality_id);
        if other.age != 0 {
            self.age = other.age;
        }
        overlay(&mut self.gender, other.gender);
        overlay(&mut self.health_concern, other.health_concern);
    }

    fn has_identity(&self) -> bool {
        !self.id.is_empty()
            || !self.full_name.is_empty()
            || !self.email.is_empty()
            || !self.health_concern.is_empty()
    }
}

/// A client record the backend has just confirmed.
///
/// The only way to hand a record to the wizard's advance path. Construction
/// requires at least one identifying field, so an empty or unrelated value
/// can never be mistaken for a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedRecord(ClientModel);

impl ConfirmedRecord {
    pub fn new(record: ClientModel) -> Result<Self, CoreError> {
        if record.has_identity() {
            Ok(Self(record))
        } else {
            Err(CoreError::MissingField(
                "Id, FullName, Email or HealthConcern".to_string(),
            ))
        }
    }

    pub fn record(&self) -> &ClientModel {
        &self.0
    }

    pub fn into_record(self) -> ClientModel {
        self.0
    }
}
