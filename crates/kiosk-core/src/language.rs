use serde::{Deserialize, Serialize};

/// Display language of the kiosk. Only affects labels; stored values are
/// always the canonical English ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// Pick the localized text when available, otherwise the English one.
    pub fn pick<'a>(self, en: &'a str, ar: Option<&'a str>) -> &'a str {
        match (self, ar) {
            (Language::Ar, Some(ar)) if !ar.is_empty() => ar,
            _ => en,
        }
    }
}
