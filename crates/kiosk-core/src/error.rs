use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown risk level: {0}")]
    UnknownRiskLevel(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}
