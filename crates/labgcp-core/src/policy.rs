//! Quota enforcement and lifecycle-transition preconditions
//!
//! Pure decisions over snapshots: no provider calls, no side effects. The
//! caller surfaces denials and decides what to do.

use crate::error::PolicyError;
use labgcp_cloud::{InstanceRecord, InstanceStatus};

/// Mutating operation subject to a state precondition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    Start,
    Stop,
    Delete,
    Resize,
}

impl std::fmt::Display for LifecycleOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleOp::Start => write!(f, "start"),
            LifecycleOp::Stop => write!(f, "stop"),
            LifecycleOp::Delete => write!(f, "delete"),
            LifecycleOp::Resize => write!(f, "resize"),
        }
    }
}

/// Decide whether `user` may create an instance named `canonical_name`.
///
/// Denies when the user already owns `max_instances` instances (counted via
/// the `owner` label in the live listing), or when the canonical name is
/// already taken by any instance regardless of quota headroom.
pub fn check_create(
    user: &str,
    canonical_name: &str,
    instances: &[InstanceRecord],
    max_instances: usize,
) -> Result<(), PolicyError> {
    let owned = instances
        .iter()
        .filter(|i| i.owner() == Some(user))
        .count();
    if owned >= max_instances {
        return Err(PolicyError::QuotaExceeded {
            limit: max_instances,
        });
    }

    if instances.iter().any(|i| i.name == canonical_name) {
        return Err(PolicyError::NameCollision(canonical_name.to_string()));
    }

    Ok(())
}

/// Decide whether `op` may run against an instance currently in `status`.
///
/// Stopping is asynchronous on the provider side, so the resize denial tells
/// the user to wait for a recent stop to settle rather than retrying
/// immediately.
pub fn check_transition(op: LifecycleOp, status: InstanceStatus) -> Result<(), PolicyError> {
    use InstanceStatus::*;

    let reason = match op {
        LifecycleOp::Resize if status != Terminated => Some(
            "You must stop your instance before changing its machine type. If you have \
             recently sent a stop command, wait one or two minutes for the instance to \
             stop fully before trying to set the machine type again."
                .to_string(),
        ),
        LifecycleOp::Start if matches!(status, Running | Provisioning | Staging) => {
            Some(format!("The instance is already {status}; starting it again would have no effect."))
        }
        LifecycleOp::Stop if status == Terminated => {
            Some("The instance is already stopped.".to_string())
        }
        LifecycleOp::Stop if status == Stopping => {
            Some("A stop is already in progress; it may take one or two minutes to complete.".to_string())
        }
        _ => None,
    };

    match reason {
        Some(reason) => Err(PolicyError::InvalidTransition { op, status, reason }),
        None => Ok(()),
    }
}
