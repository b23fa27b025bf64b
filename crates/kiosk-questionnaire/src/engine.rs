//! Per-condition questionnaire state machine.
//!
//! The engine presents one condition's questions in bank order, records one
//! canonical answer per question and, once the last question is answered,
//! scores and classifies the result.

use std::collections::BTreeMap;

use kiosk_core::language::Language;
use kiosk_core::models::{QuestionnaireAnswer, RiskLevel};

use crate::bank::{ConditionQuestionnaire, Question, QuestionBank};
use crate::error::QuestionnaireError;
use crate::scoring;

/// Finished questionnaire for one condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireOutcome {
    /// Question index → canonical answer value.
    pub answers: BTreeMap<usize, String>,
    pub score: i32,
    pub risk_level: RiskLevel,
}

impl QuestionnaireOutcome {
    /// Wire form for the backend. Result ids are assigned server-side.
    pub fn to_answers(&self) -> Vec<QuestionnaireAnswer> {
        self.answers
            .iter()
            .map(|(index, answer)| QuestionnaireAnswer {
                arrhythmia_result_id: 0,
                index: *index,
                answer: answer.clone(),
            })
            .collect()
    }
}

/// What happened after an answer or a forward move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Now showing this question.
    Question(usize),
    Completed(QuestionnaireOutcome),
}

/// Result of moving backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Question(usize),
    /// Back was pressed on the first question; the caller decides where to
    /// go (previous condition or previous wizard step).
    LeaveCondition,
}

#[derive(Debug, Clone)]
pub struct QuestionnaireEngine {
    condition: String,
    questionnaire: ConditionQuestionnaire,
    current: usize,
    answers: BTreeMap<usize, String>,
    completed: bool,
}

impl QuestionnaireEngine {
    pub fn new(bank: &QuestionBank, condition: &str) -> Result<Self, QuestionnaireError> {
        let questionnaire = bank
            .get(condition)
            .ok_or_else(|| QuestionnaireError::UnknownCondition(condition.to_string()))?;
        if questionnaire.questions.is_empty() {
            return Err(QuestionnaireError::NoQuestions(condition.to_string()));
        }
        Ok(Self {
            condition: condition.to_string(),
            questionnaire: questionnaire.clone(),
            current: 0,
            answers: BTreeMap::new(),
            completed: false,
        })
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn title(&self, lang: Language) -> &str {
        self.questionnaire.title(lang)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questionnaire.questions[self.current]
    }

    pub fn question_count(&self) -> usize {
        self.questionnaire.questions.len()
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn is_last(&self) -> bool {
        self.current + 1 == self.question_count()
    }

    /// Record `value` for the current question. Advances, or completes when
    /// the current question is the last one.
    ///
    /// `value` must name one of the question's answers, either canonically
    /// or by a display label. The canonical value is what gets stored.
    pub fn answer(&mut self, value: impl Into<String>) -> Result<Step, QuestionnaireError> {
        if self.completed {
            return Err(QuestionnaireError::AlreadyCompleted);
        }
        let value = value.into();
        if value.trim().is_empty() {
            return Err(QuestionnaireError::EmptyAnswer);
        }
        let canonical = self
            .current_question()
            .canonical_answer(&value)
            .ok_or_else(|| QuestionnaireError::InvalidAnswer {
                index: self.current,
                value: value.clone(),
            })?
            .to_string();
        self.answers.insert(self.current, canonical);

        if self.is_last() {
            Ok(Step::Completed(self.complete()))
        } else {
            self.current += 1;
            Ok(Step::Question(self.current))
        }
    }

    /// Answer the current question by option position. The stored value is
    /// the canonical option, never the translated label shown at `index`.
    pub fn answer_option(&mut self, index: usize) -> Result<Step, QuestionnaireError> {
        let values = self.current_question().answer_values();
        let value = values
            .get(index)
            .map(|v| v.to_string())
            .ok_or(QuestionnaireError::OptionOutOfRange {
                index,
                len: values.len(),
            })?;
        self.answer(value)
    }

    /// Jump to an already answered question.
    pub fn go_to(&mut self, index: usize) -> Result<(), QuestionnaireError> {
        if index >= self.question_count() || !self.is_answered(index) {
            return Err(QuestionnaireError::NotAnswered { index });
        }
        self.current = index;
        Ok(())
    }

    pub fn back(&mut self) -> Navigation {
        if self.current == 0 {
            Navigation::LeaveCondition
        } else {
            self.current -= 1;
            Navigation::Question(self.current)
        }
    }

    /// Move forward over an answered question. On the last question this
    /// completes, provided every question has an answer.
    pub fn next(&mut self) -> Result<Step, QuestionnaireError> {
        if self.completed {
            return Err(QuestionnaireError::AlreadyCompleted);
        }
        if !self.is_answered(self.current) {
            return Err(QuestionnaireError::NotAnswered {
                index: self.current,
            });
        }
        if !self.is_last() {
            self.current += 1;
            return Ok(Step::Question(self.current));
        }
        if let Some(missing) = (0..self.question_count()).find(|i| !self.is_answered(*i)) {
            return Err(QuestionnaireError::NotAnswered { index: missing });
        }
        Ok(Step::Completed(self.complete()))
    }

    fn complete(&mut self) -> QuestionnaireOutcome {
        let score = scoring::total_score(&self.questionnaire, &self.answers);
        let risk_level = scoring::classify(score, self.questionnaire.min_score_threshold);
        self.completed = true;
        tracing::info!(
            condition = %self.condition,
            score,
            risk = %risk_level,
            "questionnaire completed"
        );
        QuestionnaireOutcome {
            answers: self.answers.clone(),
            score,
            risk_level,
        }
    }
}
