//! Compute provider trait definition

use crate::error::Result;
use crate::instance::InstanceRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Compute provider abstraction trait
///
/// The concrete implementation wraps the vendor's CLI and REST API; tests
/// substitute a scripted mock. Mutating calls return the provider's
/// asynchronous operation record, not the settled instance — callers that
/// need post-operation state must re-query.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// List all instances in the project/zone.
    async fn list_instances(&self, project: &str, zone: &str) -> Result<Vec<InstanceRecord>>;

    /// Fetch a single instance, including its label fingerprint.
    async fn get_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<InstanceRecord>;

    /// Create an instance from the given spec.
    async fn insert_instance(
        &self,
        project: &str,
        zone: &str,
        spec: &InstanceSpec,
    ) -> Result<OperationInfo>;

    /// Start a stopped instance.
    async fn start_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<OperationInfo>;

    /// Stop a running instance.
    async fn stop_instance(&self, project: &str, zone: &str, name: &str) -> Result<OperationInfo>;

    /// Delete an instance and its boot disk.
    async fn delete_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<OperationInfo>;

    /// Change the machine type of a stopped instance.
    async fn set_machine_type(
        &self,
        project: &str,
        zone: &str,
        name: &str,
        machine_type: &str,
    ) -> Result<OperationInfo>;

    /// Replace the full label set. `fingerprint` must be the value read from
    /// the current record; a stale one fails with
    /// [`CloudError::LabelConflict`](crate::CloudError::LabelConflict).
    async fn set_labels(
        &self,
        project: &str,
        zone: &str,
        name: &str,
        labels: &HashMap<String, String>,
        fingerprint: &str,
    ) -> Result<OperationInfo>;
}

/// Parameters for instance insertion
#[derive(Debug, Clone)]
pub struct InstanceSpec {
    pub name: String,
    pub machine_type: String,
    pub boot_disk_size_gb: i64,
    pub disk_type: String,
    pub image: String,
    pub image_project: String,
    pub labels: HashMap<String, String>,
    /// Rendered bootstrap script passed as instance metadata.
    pub startup_script: Option<String>,
    /// Firewall tags, e.g. `allow-http`.
    pub network_tags: Vec<String>,
}

/// Asynchronous operation record returned by mutating calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInfo {
    pub name: Option<String>,

    pub operation_type: Option<String>,

    /// URL of the resource the operation acts on.
    pub target_link: String,

    pub status: Option<String>,
}

impl OperationInfo {
    /// Trailing segment of the target link: the name the provider settled on
    /// for the affected instance.
    pub fn target_name(&self) -> &str {
        self.target_link
            .rsplit('/')
            .next()
            .unwrap_or(&self.target_link)
    }
}

/// Bounded re-query loop for eventually-consistent reads
///
/// After create/start the provider's immediate response does not yet carry
/// the assigned external address; the orchestrator re-queries on this cadence
/// until the address appears or attempts run out.
#[derive(Debug, Clone, Copy)]
pub struct AddressPoll {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for AddressPoll {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_parses_and_extracts_target_name() {
        let json = r#"{
            "name": "operation-1607444312",
            "operationType": "insert",
            "targetLink": "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-f/instances/rstudio-bob",
            "status": "RUNNING"
        }"#;

        let op: OperationInfo = serde_json::from_str(json).unwrap();
        assert_eq!(op.target_name(), "rstudio-bob");
        assert_eq!(op.operation_type.as_deref(), Some("insert"));
    }

    #[test]
    fn target_name_of_bare_link_is_the_link() {
        let op = OperationInfo {
            name: None,
            operation_type: None,
            target_link: "rstudio-bob".to_string(),
            status: None,
        };
        assert_eq!(op.target_name(), "rstudio-bob");
    }
}
