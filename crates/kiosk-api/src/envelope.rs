use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;
use crate::error::ApiError;

/// Wrapper around every backend response.
///
/// `IsSuccess: false` is a failure even when the HTTP status is 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub is_success: bool,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(result: T) -> Self {
        Self {
            is_success: true,
            result: Some(result),
        }
    }

    pub fn rejected() -> Self {
        Self {
            is_success: false,
            result: None,
        }
    }

    /// The result of a successful response. A success without a result is
    /// an error.
    pub fn into_result(self, endpoint: Endpoint) -> Result<T, ApiError> {
        self.into_optional(endpoint)?
            .ok_or(ApiError::MissingResult { endpoint })
    }

    /// Like [`into_result`](Self::into_result), for endpoints whose result
    /// may legitimately be null.
    pub fn into_optional(self, endpoint: Endpoint) -> Result<Option<T>, ApiError> {
        if !self.is_success {
            tracing::warn!(%endpoint, "backend reported failure");
            return Err(ApiError::Rejected { endpoint });
        }
        Ok(self.result)
    }

    /// Decode an envelope from a raw JSON body.
    pub fn from_value(endpoint: Endpoint, value: serde_json::Value) -> Result<Self, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value(value).map_err(|source| ApiError::Decode { endpoint, source })
    }
}
