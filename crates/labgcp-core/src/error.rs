//! Policy and orchestration error types

use crate::policy::LifecycleOp;
use labgcp_cloud::{CloudError, InstanceStatus};
use thiserror::Error;

/// A gate denial. Recoverable by user action; never retried automatically.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error(
        "You already have {limit} instances in use. Please delete one before creating another.\n\
        You can see your existing instances with \"lab-gcp list-instances\"."
    )]
    QuotaExceeded { limit: usize },

    #[error("An instance named {0} already exists. Pick a different name with --instance.")]
    NameCollision(String),

    #[error("Cannot {op} an instance that is {status}. {reason}")]
    InvalidTransition {
        op: LifecycleOp,
        status: InstanceStatus,
        reason: String,
    },
}

/// Any failure of a lifecycle operation: a gate denial or a provider error.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Cloud(#[from] CloudError),
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
