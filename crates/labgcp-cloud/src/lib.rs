//! Compute provider abstraction for lab-gcp
//!
//! This crate defines the typed boundary between the lab-gcp decision core
//! and the cloud provider that actually owns the instances. The core only
//! ever sees the types defined here; the raw provider responses (gcloud JSON,
//! Compute REST bodies) are mapped into them at the provider crate boundary.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  lab-gcp CLI                     │
//! │        (create-instance, stop-instance, …)       │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                labgcp-core                       │
//! │   naming / quota / transitions / orchestrator    │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                labgcp-cloud                      │
//! │  trait ComputeProvider + typed records           │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │             labgcp-cloud-gce                     │
//! │     gcloud / gsutil / Compute REST wrapper       │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod instance;
pub mod provider;

// Re-exports
pub use error::{CloudError, Result};
pub use instance::{
    AccessConfig, InstanceRecord, InstanceStatus, NetworkInterface, ENV_TIME_MANAGED,
    ENV_TIME_UNMANAGED, LABEL_ENV, LABEL_OWNER,
};
pub use provider::{AddressPoll, ComputeProvider, InstanceSpec, OperationInfo};
