pub mod client;
pub mod condition;
pub mod scan;
pub mod user_data;

pub use client::{ClientModel, ConfirmedRecord};
pub use condition::{ConditionWithQuestionnaire, QuestionnaireAnswer, RiskLevel};
pub use scan::ScanResult;
pub use user_data::{
    Gender, PersonalInfo, PersonalInfoPatch, UserData, UserDataPatch, Vitals, VitalsPatch,
};

/// Lenient deserializers for server fields whose JSON type drifts between
/// endpoints (numbers sent as strings and vice versa).
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
        Null,
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Raw::deserialize(d)? {
            Raw::Str(s) => s,
            Raw::Int(n) => n.to_string(),
            Raw::Float(f) => f.to_string(),
            Raw::Null => String::new(),
        })
    }

    pub fn u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(match Raw::deserialize(d)? {
            Raw::Str(s) => s.trim().parse().unwrap_or(0),
            Raw::Int(n) => u32::try_from(n).unwrap_or(0),
            Raw::Float(f) if f >= 0.0 => f as u32,
            Raw::Float(_) | Raw::Null => 0,
        })
    }
}
