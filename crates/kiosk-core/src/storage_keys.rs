//! Session storage key conventions.
//!
//! Pure string functions with no storage dependency. These define the canonical
//! names of everything the kiosk persists between screens and reloads.

/// Server-issued client identifier (short-lived, ~1 day).
pub const CLIENT_ID: &str = "userId";

/// JSON snapshot of the in-progress client record.
pub const CLIENT_SNAPSHOT: &str = "clientData";

/// Persisted questionnaire result for one condition.
pub fn questionnaire_fallback(client_id: &str, condition: &str) -> String {
    format!("questionnaire_{client_id}_{condition}")
}

/// Master list of every persisted questionnaire result for a client.
pub fn questionnaire_index(client_id: &str) -> String {
    format!("questionnaires_{client_id}")
}
