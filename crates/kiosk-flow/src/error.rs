use kiosk_core::validation::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("backend error: {0}")]
    Api(#[from] kiosk_api::ApiError),

    #[error("questionnaire error: {0}")]
    Questionnaire(#[from] kiosk_questionnaire::QuestionnaireError),

    #[error(transparent)]
    Core(#[from] kiosk_core::error::CoreError),

    #[error("no client id for this session")]
    MissingClientId,

    #[error("no e-mail address to send the report to")]
    MissingEmail,

    #[error("condition not in this assessment: {0}")]
    UnknownCondition(String),

    #[error("action not available while {0}")]
    InvalidState(&'static str),

    /// The screen that started the request has gone away.
    #[error("screen no longer active")]
    Stale,
}
