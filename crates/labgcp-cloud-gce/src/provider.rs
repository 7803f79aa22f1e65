//! GCE provider implementation

use crate::api::ComputeApi;
use crate::error::GceError;
use crate::gcloud::Gcloud;
use async_trait::async_trait;
use labgcp_cloud::{CloudError, ComputeProvider, InstanceRecord, InstanceSpec, OperationInfo};
use std::collections::HashMap;

/// The lab's shared VPC; assumed to exist with its firewall rules.
pub const NETWORK: &str = "managed";

/// Per-region subnet of [`NETWORK`].
pub const SUBNET: &str = "managed-subnet";

/// Google Compute Engine provider
pub struct GceProvider {
    gcloud: Gcloud,
    api: ComputeApi,
}

impl GceProvider {
    pub fn new() -> Self {
        Self {
            gcloud: Gcloud::new(),
            api: ComputeApi::new(),
        }
    }

    /// Verify the SDK is installed before any command runs.
    pub async fn check_installed(&self) -> labgcp_cloud::Result<()> {
        self.gcloud.check_installed().await.map_err(to_cloud)
    }

    /// Access to the underlying CLI wrapper for pass-through listings.
    pub fn gcloud(&self) -> &Gcloud {
        &self.gcloud
    }
}

impl Default for GceProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn to_cloud(e: GceError) -> CloudError {
    match e {
        GceError::InstanceNotFound(name) => CloudError::InstanceNotFound(name),
        GceError::LabelConflict(name) => CloudError::LabelConflict(name),
        GceError::CommandFailed(msg) => CloudError::CommandFailed(msg),
        GceError::GcloudNotFound | GceError::GsutilNotFound => {
            CloudError::CommandFailed(e.to_string())
        }
        GceError::ApiError(msg) => CloudError::ApiError(msg),
        GceError::TokenFailed(msg) => CloudError::ApiError(msg),
        GceError::Http(e) => CloudError::ApiError(e.to_string()),
        GceError::Json(e) => CloudError::Json(e),
        GceError::Io(e) => CloudError::Io(e),
    }
}

#[async_trait]
impl ComputeProvider for GceProvider {
    async fn list_instances(
        &self,
        project: &str,
        zone: &str,
    ) -> labgcp_cloud::Result<Vec<InstanceRecord>> {
        self.gcloud
            .list_instances(project, zone)
            .await
            .map_err(to_cloud)
    }

    async fn get_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> labgcp_cloud::Result<InstanceRecord> {
        self.gcloud
            .describe_instance(project, zone, name)
            .await
            .map_err(to_cloud)
    }

    async fn insert_instance(
        &self,
        project: &str,
        zone: &str,
        spec: &InstanceSpec,
    ) -> labgcp_cloud::Result<OperationInfo> {
        tracing::info!("Creating instance {}", spec.name);
        self.gcloud
            .create_instance(project, zone, spec)
            .await
            .map_err(to_cloud)
    }

    async fn start_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        tracing::info!("Starting instance {name}");
        self.gcloud
            .start_instance(project, zone, name)
            .await
            .map_err(to_cloud)
    }

    async fn stop_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        tracing::info!("Stopping instance {name}");
        self.gcloud
            .stop_instance(project, zone, name)
            .await
            .map_err(to_cloud)
    }

    async fn delete_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        tracing::info!("Deleting instance {name}");
        self.gcloud
            .delete_instance(project, zone, name)
            .await
            .map_err(to_cloud)
    }

    async fn set_machine_type(
        &self,
        project: &str,
        zone: &str,
        name: &str,
        machine_type: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        tracing::info!("Setting machine type of {name} to {machine_type}");
        self.gcloud
            .set_machine_type(project, zone, name, machine_type)
            .await
            .map_err(to_cloud)
    }

    async fn set_labels(
        &self,
        project: &str,
        zone: &str,
        name: &str,
        labels: &HashMap<String, String>,
        fingerprint: &str,
    ) -> labgcp_cloud::Result<OperationInfo> {
        let token = self.gcloud.access_token().await.map_err(to_cloud)?;
        self.api
            .set_labels(&token, project, zone, name, labels, fingerprint)
            .await
            .map_err(to_cloud)
    }
}
