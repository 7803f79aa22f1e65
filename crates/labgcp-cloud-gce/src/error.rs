//! GCE provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GceError {
    #[error("gcloud not found. Install the Google Cloud SDK: https://cloud.google.com/sdk/docs/install")]
    GcloudNotFound,

    #[error("gsutil not found. It ships with the Google Cloud SDK: https://cloud.google.com/sdk/docs/install")]
    GsutilNotFound,

    #[error("gcloud command failed: {0}")]
    CommandFailed(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Label fingerprint conflict on instance {0}")]
    LabelConflict(String),

    #[error("Compute API error: {0}")]
    ApiError(String),

    #[error("Failed to obtain an access token from gcloud: {0}")]
    TokenFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GceError>;
