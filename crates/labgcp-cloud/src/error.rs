//! Provider boundary error types

use thiserror::Error;

/// Errors surfaced across the provider boundary
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Label fingerprint is stale for instance {0}; the labels were modified concurrently. Re-run the command to retry against the current label set.")]
    LabelConflict(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Instance {instance} has no external address after {attempts} checks; the provider may still be assigning one. Check `lab-gcp list-instances` in a minute.")]
    AddressTimeout { instance: String, attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
