use std::collections::BTreeMap;
use std::fmt;

use kiosk_core::language::Language;
use serde::{Deserialize, Serialize};

use crate::error::QuestionnaireError;

/// The bank shipped with the kiosk.
const BUNDLED: &str = include_str!("../data/questionnaire.json");

/// Canonical answers for a yes/no question.
pub const YES_NO: [&str; 2] = ["Yes", "No"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    YesNo,
    MultipleChoice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(default)]
    pub text_ar: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Canonical option values. Only used by multiple-choice questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// Display labels parallel to `options`.
    #[serde(default)]
    pub options_ar: Option<Vec<String>>,
    /// Points per canonical answer value.
    pub scoring: BTreeMap<String, i32>,
}

impl Question {
    pub fn text(&self, lang: Language) -> &str {
        lang.pick(&self.text, self.text_ar.as_deref())
    }

    /// Every answer value a user can produce for this question.
    pub fn answer_values(&self) -> Vec<&str> {
        match self.kind {
            QuestionType::YesNo => YES_NO.to_vec(),
            QuestionType::MultipleChoice => self.options.iter().map(String::as_str).collect(),
        }
    }

    /// Display labels, index-aligned with [`Question::answer_values`].
    /// Falls back to the canonical value wherever a translation is missing.
    pub fn option_labels(&self, lang: Language) -> Vec<&str> {
        let values = self.answer_values();
        match (lang, &self.options_ar, self.kind) {
            (Language::Ar, Some(labels), QuestionType::MultipleChoice) => values
                .iter()
                .enumerate()
                .map(|(i, v)| labels.get(i).map(String::as_str).unwrap_or(*v))
                .collect(),
            _ => values,
        }
    }

    /// Map user input onto a canonical answer value.
    ///
    /// Canonical values and display labels in either language match
    /// case-insensitively; a label resolves to the value at its index.
    pub fn canonical_answer(&self, input: &str) -> Option<&str> {
        let input = input.trim();
        let values = self.answer_values();
        if let Some(exact) = values.iter().copied().find(|v| *v == input) {
            return Some(exact);
        }
        [Language::En, Language::Ar].into_iter().find_map(|lang| {
            self.option_labels(lang)
                .iter()
                .position(|label| label.trim().eq_ignore_ascii_case(input))
                .and_then(|i| values.get(i).copied())
        })
    }

    /// Points for an answer. Values missing from `scoring` count as zero.
    pub fn points(&self, answer: &str) -> i32 {
        self.scoring.get(answer).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionQuestionnaire {
    pub title: String,
    #[serde(default)]
    pub title_ar: Option<String>,
    pub questions: Vec<Question>,
    pub min_score_threshold: i32,
}

impl ConditionQuestionnaire {
    pub fn title(&self, lang: Language) -> &str {
        lang.pick(&self.title, self.title_ar.as_deref())
    }
}

/// A data-entry problem found in the bank at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankIssue {
    NoQuestions {
        condition: String,
    },
    MissingOptions {
        condition: String,
        question: usize,
    },
    UnscoredAnswer {
        condition: String,
        question: usize,
        answer: String,
    },
    LabelCountMismatch {
        condition: String,
        question: usize,
        options: usize,
        labels: usize,
    },
}

impl fmt::Display for BankIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankIssue::NoQuestions { condition } => write!(f, "{condition}: no questions"),
            BankIssue::MissingOptions {
                condition,
                question,
            } => write!(f, "{condition} Q{}: multiple choice without options", question + 1),
            BankIssue::UnscoredAnswer {
                condition,
                question,
                answer,
            } => write!(f, "{condition} Q{}: no score for answer '{answer}'", question + 1),
            BankIssue::LabelCountMismatch {
                condition,
                question,
                options,
                labels,
            } => write!(
                f,
                "{condition} Q{}: {options} options but {labels} translated labels",
                question + 1
            ),
        }
    }
}

/// Condition name → questionnaire. Loaded once, read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    conditions: BTreeMap<String, ConditionQuestionnaire>,
}

impl QuestionBank {
    /// The bank compiled into the binary.
    pub fn bundled() -> Result<Self, QuestionnaireError> {
        Self::from_json(BUNDLED)
    }

    /// Parse a bank. Malformed JSON is an error; data-entry problems are
    /// logged and otherwise tolerated (an unscored answer counts as zero).
    pub fn from_json(json: &str) -> Result<Self, QuestionnaireError> {
        let bank: Self = serde_json::from_str(json)?;
        for issue in bank.lint() {
            tracing::warn!(%issue, "question bank issue");
        }
        tracing::debug!(conditions = bank.conditions.len(), "question bank loaded");
        Ok(bank)
    }

    pub fn get(&self, condition: &str) -> Option<&ConditionQuestionnaire> {
        self.conditions.get(condition)
    }

    pub fn contains(&self, condition: &str) -> bool {
        self.conditions.contains_key(condition)
    }

    pub fn condition_names(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    /// Check every reachable answer has a score and translations line up.
    pub fn lint(&self) -> Vec<BankIssue> {
        let mut issues = Vec::new();
        for (name, questionnaire) in &self.conditions {
            if questionnaire.questions.is_empty() {
                issues.push(BankIssue::NoQuestions {
                    condition: name.clone(),
                });
            }
            for (i, question) in questionnaire.questions.iter().enumerate() {
                if question.kind == QuestionType::MultipleChoice && question.options.is_empty() {
                    issues.push(BankIssue::MissingOptions {
                        condition: name.clone(),
                        question: i,
                    });
                }
                for answer in question.answer_values() {
                    if !question.scoring.contains_key(answer) {
                        issues.push(BankIssue::UnscoredAnswer {
                            condition: name.clone(),
                            question: i,
                            answer: answer.to_string(),
                        });
                    }
                }
                if let Some(labels) = &question.options_ar
                    && question.kind == QuestionType::MultipleChoice
                    && labels.len() != question.options.len()
                {
                    issues.push(BankIssue::LabelCountMismatch {
                        condition: name.clone(),
                        question: i,
                        options: question.options.len(),
                        labels: labels.len(),
                    });
                }
            }
        }
        issues
    }
}
