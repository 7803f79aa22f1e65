//! Typed instance snapshots
//!
//! `InstanceRecord` is the read-only view of an instance the provider hands
//! back. It is owned and mutated exclusively by the provider; the core only
//! reads snapshots of it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label key identifying the user who owns an instance. Drives quota
/// accounting.
pub const LABEL_OWNER: &str = "owner";

/// Label key read by the lab's scheduled shutdown/startup job.
pub const LABEL_ENV: &str = "env";

/// Instance is shut off every night by the scheduled job.
pub const ENV_TIME_MANAGED: &str = "time-managed";

/// Instance stays on past midnight.
pub const ENV_TIME_UNMANAGED: &str = "time-unmanaged";

/// Snapshot of a compute instance as reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRecord {
    pub name: String,

    pub status: InstanceStatus,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    /// Concurrency token the provider requires to be echoed back on label
    /// updates.
    pub label_fingerprint: Option<String>,

    /// Full machine-type URL, e.g. `.../zones/us-central1-f/machineTypes/n1-highmem-8`
    pub machine_type: Option<String>,

    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,
}

impl InstanceRecord {
    /// The user recorded in the `owner` label, if any.
    pub fn owner(&self) -> Option<&str> {
        self.labels.get(LABEL_OWNER).map(String::as_str)
    }

    /// The first externally reachable NAT address, if one has been assigned.
    pub fn external_ip(&self) -> Option<&str> {
        self.network_interfaces
            .iter()
            .flat_map(|nic| nic.access_configs.iter())
            .find_map(|ac| ac.nat_ip.as_deref())
    }

    /// Trailing segment of the machine-type URL (the short type name).
    pub fn machine_type_name(&self) -> Option<&str> {
        self.machine_type
            .as_deref()
            .and_then(|mt| mt.rsplit('/').next())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    #[serde(default)]
    pub access_configs: Vec<AccessConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    #[serde(rename = "natIP")]
    pub nat_ip: Option<String>,
}

/// Instance lifecycle status as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Provisioning,
    Staging,
    Running,
    Stopping,
    Suspending,
    Suspended,
    Repairing,
    Terminated,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceStatus::Provisioning => write!(f, "PROVISIONING"),
            InstanceStatus::Staging => write!(f, "STAGING"),
            InstanceStatus::Running => write!(f, "RUNNING"),
            InstanceStatus::Stopping => write!(f, "STOPPING"),
            InstanceStatus::Suspending => write!(f, "SUSPENDING"),
            InstanceStatus::Suspended => write!(f, "SUSPENDED"),
            InstanceStatus::Repairing => write!(f, "REPAIRING"),
            InstanceStatus::Terminated => write!(f, "TERMINATED"),
            InstanceStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_parses_from_provider_json() {
        let json = r#"{
            "name": "rstudio-bob",
            "status": "RUNNING",
            "labels": {"env": "time-managed", "owner": "bob"},
            "labelFingerprint": "42WmSpB8rSM=",
            "machineType": "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-f/machineTypes/n1-highmem-8",
            "networkInterfaces": [
                {"accessConfigs": [{"natIP": "34.66.1.2"}]}
            ]
        }"#;

        let record: InstanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "rstudio-bob");
        assert_eq!(record.status, InstanceStatus::Running);
        assert_eq!(record.owner(), Some("bob"));
        assert_eq!(record.external_ip(), Some("34.66.1.2"));
        assert_eq!(record.machine_type_name(), Some("n1-highmem-8"));
        assert_eq!(record.label_fingerprint.as_deref(), Some("42WmSpB8rSM="));
    }

    #[test]
    fn record_tolerates_missing_optional_fields() {
        let json = r#"{"name": "bare", "status": "TERMINATED"}"#;
        let record: InstanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, InstanceStatus::Terminated);
        assert!(record.owner().is_none());
        assert!(record.external_ip().is_none());
    }

    #[test]
    fn unrecognized_status_maps_to_unknown() {
        let json = r#"{"name": "x", "status": "DEFRAGMENTING"}"#;
        let record: InstanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, InstanceStatus::Unknown);
    }
}
