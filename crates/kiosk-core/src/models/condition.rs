use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Per-condition risk level assigned by the backend or by a questionnaire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[default]
    None,
    Suspected,
    HighRisk,
}

impl RiskLevel {
    /// Only suspected and high-risk conditions get a questionnaire.
    pub fn requires_questionnaire(self) -> bool {
        matches!(self, Self::Suspected | Self::HighRisk)
    }

    /// Integer form used by the bulk questionnaire endpoint.
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Suspected => 1,
            Self::HighRisk => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Suspected => "Suspected",
            Self::HighRisk => "HighRisk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(Self::None),
            "Suspected" => Ok(Self::Suspected),
            "HighRisk" => Ok(Self::HighRisk),
            other => Err(CoreError::UnknownRiskLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionnaireAnswer {
    pub arrhythmia_result_id: i64,
    pub index: usize,
    pub answer: String,
}

/// One suspected or high-risk condition returned by
/// `GET /Arrhythmia/GetArrhythmiaRequests`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConditionWithQuestionnaire {
    pub id: i64,
    /// Key into the question bank.
    pub arrhythmia_name: String,
    pub initial_risk_level: RiskLevel,
    pub questionnaire_risk_level: Option<RiskLevel>,
    pub questionnaire_score: Option<i32>,
    pub answers: Vec<QuestionnaireAnswer>,
    pub confidence: f64,
    pub is_detected: Option<bool>,
}

impl ConditionWithQuestionnaire {
    pub fn new(name: impl Into<String>, initial_risk_level: RiskLevel) -> Self {
        Self {
            arrhythmia_name: name.into(),
            initial_risk_level,
            ..Default::default()
        }
    }

    pub fn requires_questionnaire(&self) -> bool {
        self.initial_risk_level.requires_questionnaire()
    }

    pub fn is_completed(&self) -> bool {
        !self.answers.is_empty()
    }

    /// Record a finished questionnaire on this condition.
    pub fn apply_result(&mut self, answers: Vec<QuestionnaireAnswer>, score: i32, risk: RiskLevel) {
        self.answers = answers;
        self.questionnaire_score = Some(score);
        self.questionnaire_risk_level = Some(risk);
    }
}
