//! Lifecycle orchestrator
//!
//! Sequences each instance operation: resolve the canonical name, run the
//! gate, call the provider, and re-query for eventually-consistent state.
//! A gate denial fails fast — no mutating provider call is made.

use crate::error::Result;
use crate::naming::canonical_name;
use crate::policy::{self, LifecycleOp};
use labgcp_cloud::{
    AddressPoll, CloudError, ComputeProvider, InstanceSpec, ENV_TIME_MANAGED, ENV_TIME_UNMANAGED,
    LABEL_ENV, LABEL_OWNER,
};
use std::collections::HashMap;
use tokio::time::sleep;

/// Parameters for a create operation, resolved from settings and flags by
/// the caller.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub user: String,
    /// Short instance name; the owner suffix is applied here.
    pub instance: String,
    pub machine_type: String,
    pub boot_disk_size_gb: i64,
    pub image: String,
    pub image_project: String,
    /// Rendered bootstrap script, attached as instance metadata.
    pub startup_script: Option<String>,
}

/// Result of a create or start: the settled name and the address the
/// provider assigned.
#[derive(Debug, Clone)]
pub struct LaunchOutcome {
    pub name: String,
    pub address: String,
}

/// Orchestrates instance operations against a [`ComputeProvider`]
pub struct InstanceManager<P> {
    provider: P,
    project: String,
    zone: String,
    max_instances: usize,
    poll: AddressPoll,
}

impl<P: ComputeProvider> InstanceManager<P> {
    pub fn new(
        provider: P,
        project: impl Into<String>,
        zone: impl Into<String>,
        max_instances: usize,
    ) -> Self {
        Self {
            provider,
            project: project.into(),
            zone: zone.into(),
            max_instances,
            poll: AddressPoll::default(),
        }
    }

    /// Override the address re-query cadence.
    pub fn with_poll(mut self, poll: AddressPoll) -> Self {
        self.poll = poll;
        self
    }

    /// Create an instance for `req.user`, gated on quota and name collision
    /// against the live listing. Returns once the provider has assigned an
    /// external address.
    pub async fn create(&self, req: &CreateRequest) -> Result<LaunchOutcome> {
        let name = canonical_name(&req.instance, &req.user);

        let instances = self
            .provider
            .list_instances(&self.project, &self.zone)
            .await?;
        policy::check_create(&req.user, &name, &instances, self.max_instances)?;

        let mut labels = HashMap::new();
        labels.insert(LABEL_ENV.to_string(), ENV_TIME_MANAGED.to_string());
        labels.insert(LABEL_OWNER.to_string(), req.user.clone());

        let spec = InstanceSpec {
            name: name.clone(),
            machine_type: req.machine_type.clone(),
            boot_disk_size_gb: req.boot_disk_size_gb,
            disk_type: "pd-standard".to_string(),
            image: req.image.clone(),
            image_project: req.image_project.clone(),
            labels,
            startup_script: req.startup_script.clone(),
            network_tags: vec!["allow-http".to_string()],
        };

        let op = self
            .provider
            .insert_instance(&self.project, &self.zone, &spec)
            .await?;
        let name = op.target_name().to_string();

        let address = self.wait_for_address(&name).await?;
        Ok(LaunchOutcome { name, address })
    }

    /// Start a stopped instance and wait for its address.
    pub async fn start(&self, user: &str, instance: &str) -> Result<LaunchOutcome> {
        let name = canonical_name(instance, user);

        let record = self
            .provider
            .get_instance(&self.project, &self.zone, &name)
            .await?;
        policy::check_transition(LifecycleOp::Start, record.status)?;

        let op = self
            .provider
            .start_instance(&self.project, &self.zone, &name)
            .await?;
        let name = op.target_name().to_string();

        let address = self.wait_for_address(&name).await?;
        Ok(LaunchOutcome { name, address })
    }

    /// Stop a running instance. The stop settles asynchronously on the
    /// provider side.
    pub async fn stop(&self, user: &str, instance: &str) -> Result<String> {
        let name = canonical_name(instance, user);

        let record = self
            .provider
            .get_instance(&self.project, &self.zone, &name)
            .await?;
        policy::check_transition(LifecycleOp::Stop, record.status)?;

        let op = self
            .provider
            .stop_instance(&self.project, &self.zone, &name)
            .await?;
        Ok(op.target_name().to_string())
    }

    /// Delete an instance and its boot disk. Interactive confirmation is the
    /// caller's responsibility and must happen before this is invoked.
    pub async fn delete(&self, user: &str, instance: &str) -> Result<String> {
        let name = canonical_name(instance, user);

        let record = self
            .provider
            .get_instance(&self.project, &self.zone, &name)
            .await?;
        policy::check_transition(LifecycleOp::Delete, record.status)?;

        let op = self
            .provider
            .delete_instance(&self.project, &self.zone, &name)
            .await?;
        Ok(op.target_name().to_string())
    }

    /// Change the machine type of a stopped instance.
    pub async fn set_machine_type(
        &self,
        user: &str,
        instance: &str,
        machine_type: &str,
    ) -> Result<String> {
        let name = canonical_name(instance, user);

        let record = self
            .provider
            .get_instance(&self.project, &self.zone, &name)
            .await?;
        policy::check_transition(LifecycleOp::Resize, record.status)?;

        let op = self
            .provider
            .set_machine_type(&self.project, &self.zone, &name, machine_type)
            .await?;
        Ok(op.target_name().to_string())
    }

    /// Toggle the scheduled-shutdown label. Fetches the current label set and
    /// fingerprint, merges the new value, and submits the fingerprint back;
    /// a concurrent label change surfaces as
    /// [`CloudError::LabelConflict`] and is not retried.
    pub async fn set_time_label(
        &self,
        user: &str,
        instance: &str,
        managed: bool,
    ) -> Result<(String, String)> {
        let name = canonical_name(instance, user);

        let record = self
            .provider
            .get_instance(&self.project, &self.zone, &name)
            .await?;
        let fingerprint = record.label_fingerprint.as_deref().ok_or_else(|| {
            CloudError::ApiError(format!("instance {name} returned no label fingerprint"))
        })?;

        let value = if managed {
            ENV_TIME_MANAGED
        } else {
            ENV_TIME_UNMANAGED
        };
        let mut labels = record.labels.clone();
        labels.insert(LABEL_ENV.to_string(), value.to_string());

        let op = self
            .provider
            .set_labels(&self.project, &self.zone, &name, &labels, fingerprint)
            .await?;
        Ok((op.target_name().to_string(), value.to_string()))
    }

    /// Re-query the listing until `name` carries an external address. The
    /// provider's immediate response to create/start never does; the address
    /// shows up within the eventual-consistency window.
    async fn wait_for_address(&self, name: &str) -> Result<String> {
        for attempt in 1..=self.poll.max_attempts {
            sleep(self.poll.interval).await;

            let instances = self
                .provider
                .list_instances(&self.project, &self.zone)
                .await?;
            if let Some(ip) = instances
                .iter()
                .find(|i| i.name == name)
                .and_then(|i| i.external_ip())
            {
                return Ok(ip.to_string());
            }

            tracing::debug!(
                "No external address for {name} yet ({attempt}/{})",
                self.poll.max_attempts
            );
        }

        Err(CloudError::AddressTimeout {
            instance: name.to_string(),
            attempts: self.poll.max_attempts,
        }
        .into())
    }
}
