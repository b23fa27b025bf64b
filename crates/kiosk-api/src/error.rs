use thiserror::Error;

use crate::endpoint::Endpoint;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint}: request failed: {message}")]
    Transport { endpoint: Endpoint, message: String },

    #[error("{endpoint}: HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },

    /// HTTP 200 with `IsSuccess: false`.
    #[error("{endpoint}: rejected by backend")]
    Rejected { endpoint: Endpoint },

    #[error("{endpoint}: response carried no result")]
    MissingResult { endpoint: Endpoint },

    #[error("{endpoint}: invalid response body: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("request task failed: {0}")]
    Task(String),
}

impl ApiError {
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Rejected { endpoint }
            | Self::MissingResult { endpoint }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
            Self::Serialization(_) | Self::Task(_) => None,
        }
    }

    pub(crate) fn from_ureq(endpoint: Endpoint, err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => Self::Status { endpoint, status },
            other => Self::Transport {
                endpoint,
                message: other.to_string(),
            },
        }
    }
}
