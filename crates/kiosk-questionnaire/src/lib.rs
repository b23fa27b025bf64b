//! kiosk-questionnaire
//!
//! Arrhythmia risk questionnaires. Pure data and state, no I/O: the static
//! question bank, score computation, and the per-condition engine that walks
//! a user through one questionnaire.

pub mod bank;
pub mod engine;
pub mod error;
pub mod scoring;

pub use bank::{BankIssue, ConditionQuestionnaire, Question, QuestionBank, QuestionType};
pub use engine::{Navigation, QuestionnaireEngine, QuestionnaireOutcome, Step};
pub use error::QuestionnaireError;
