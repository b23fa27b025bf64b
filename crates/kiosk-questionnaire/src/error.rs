use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuestionnaireError {
    #[error("no questionnaire for condition: {0}")]
    UnknownCondition(String),

    #[error("questionnaire for '{0}' has no questions")]
    NoQuestions(String),

    #[error("question {index} has not been answered")]
    NotAnswered { index: usize },

    #[error("option {index} out of range (question has {len} options)")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("'{value}' is not an answer to question {index}")]
    InvalidAnswer { index: usize, value: String },

    #[error("answer must not be empty")]
    EmptyAnswer,

    #[error("questionnaire already completed")]
    AlreadyCompleted,

    #[error("invalid question bank: {0}")]
    Parse(#[from] serde_json::Error),
}
