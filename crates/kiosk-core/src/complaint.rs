//! Symptom complaint catalogue and the comma-joined `HealthConcern` format.

use std::sync::LazyLock;

use regex::Regex;

use crate::validation::{self, ValidationErrors};

/// Selection key for the free-text complaint.
pub const OTHER: &str = "other";

/// Predefined complaints as `(key, value)`. The value is what the backend
/// stores; the key is what the screen selects.
pub const COMMON_COMPLAINTS: &[(&str, &str)] = &[
    ("headache", "Headache"),
    ("fever", "Fever"),
    ("cough", "Cough"),
    ("soreThroat", "Sore Throat"),
    ("stomachPain", "Stomach Pain"),
    ("backPain", "Back Pain"),
    ("dizziness", "Dizziness"),
    ("fatigue", "Fatigue"),
    ("nausea", "Nausea"),
    ("shortnessOfBreath", "Shortness of Breath"),
    ("chestPain", "Chest Pain"),
    (OTHER, "Other"),
];

static SYMPTOM_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[,;]|\band\b").expect("separator pattern compiles"));

/// The complaint screen's selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintSelection {
    /// Selected catalogue keys, in selection order. May contain [`OTHER`].
    pub selected: Vec<String>,
    pub other_text: String,
}

impl ComplaintSelection {
    /// Toggle a catalogue key on or off.
    pub fn toggle(&mut self, key: &str) {
        if let Some(pos) = self.selected.iter().position(|k| k == key) {
            self.selected.remove(pos);
        } else {
            self.selected.push(key.to_string());
        }
    }

    pub fn has_other(&self) -> bool {
        self.selected.iter().any(|k| k == OTHER)
    }

    /// The free-text complaint is only checked when "other" is selected.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        if self.has_other() {
            validation::validate_other_complaint(&self.other_text)
        } else {
            Ok(())
        }
    }

    /// Build the `HealthConcern` string: catalogue values in selection
    /// order, then the trimmed free text.
    pub fn to_health_concern(&self) -> String {
        let mut complaints: Vec<&str> = self
            .selected
            .iter()
            .filter(|k| k.as_str() != OTHER)
            .map(|k| value_for_key(k).unwrap_or(k.as_str()))
            .collect();

        let other = self.other_text.trim();
        if self.has_other() && !other.is_empty() {
            complaints.push(other);
        }
        complaints.join(", ")
    }

    /// Restore a selection from a stored `HealthConcern`. Entries that match
    /// neither a catalogue value nor key become the "other" text (first one
    /// wins).
    pub fn from_health_concern(concern: &str) -> Self {
        let mut selection = Self::default();
        for entry in concern.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let key = COMMON_COMPLAINTS
                .iter()
                .find(|(k, v)| *v == entry || *k == entry)
                .map(|(k, _)| *k);
            match key {
                Some(k) if k != OTHER => selection.selected.push(k.to_string()),
                _ => {
                    if !selection.has_other() {
                        selection.selected.push(OTHER.to_string());
                        selection.other_text = entry.to_string();
                    }
                }
            }
        }
        selection
    }
}

fn value_for_key(key: &str) -> Option<&'static str> {
    COMMON_COMPLAINTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Split a stored `HealthConcern` into individual symptoms for the summary.
/// Separators are commas, semicolons and the word "and"; "nothing" is
/// dropped.
pub fn split_symptoms(concern: &str) -> Vec<String> {
    SYMPTOM_SEPARATOR
        .split(concern)
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nothing"))
        .map(str::to_string)
        .collect()
}
