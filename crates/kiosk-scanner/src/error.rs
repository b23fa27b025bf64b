use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("scanner SDK unavailable: {0}")]
    Unavailable(String),

    #[error("scanner SDK initialization failed: {0}")]
    InitFailed(String),

    #[error("camera error: {0}")]
    Camera(String),

    #[error("scanner SDK is not running")]
    NotRunning,

    #[error("scanner event channel closed before the measurement finished")]
    ChannelClosed,

    #[error("no client id for this session")]
    MissingClientId,

    #[error("failed to save scan: {0}")]
    Api(#[from] kiosk_api::ApiError),
}
