//! gcloud CLI wrapper
//!
//! Wraps the `gcloud compute` commands used for instance management. All
//! structured calls run with `--format=json`; mutating calls additionally run
//! with `--async`, so their JSON output is the operation resource rather than
//! the settled instance.

use crate::error::{GceError, Result};
use labgcp_cloud::{InstanceRecord, InstanceSpec, OperationInfo};
use std::process::Stdio;
use tokio::process::Command;

/// gcloud CLI wrapper
pub struct Gcloud;

impl Gcloud {
    pub fn new() -> Self {
        Self
    }

    /// Check that gcloud is on PATH.
    pub async fn check_installed(&self) -> Result<()> {
        let which = Command::new("which").arg("gcloud").output().await?;

        if !which.status.success() {
            return Err(GceError::GcloudNotFound);
        }
        Ok(())
    }

    /// Run a gcloud command and return stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("gcloud");
        cmd.args(args);
        cmd.arg("--quiet");
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: gcloud {} --quiet", args.join(" "));

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GceError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a gcloud command with inherited stdio, so the user sees gcloud's
    /// own table output.
    pub async fn run_passthrough(&self, args: &[&str]) -> Result<()> {
        tracing::debug!("Running (passthrough): gcloud {}", args.join(" "));

        let status = Command::new("gcloud").args(args).status().await?;

        if !status.success() {
            return Err(GceError::CommandFailed(format!(
                "gcloud exited with {status}"
            )));
        }
        Ok(())
    }

    /// List all instances in the project/zone.
    pub async fn list_instances(&self, project: &str, zone: &str) -> Result<Vec<InstanceRecord>> {
        let output = self
            .run(&[
                "compute",
                "instances",
                "list",
                "--project",
                project,
                "--zones",
                zone,
                "--format=json",
            ])
            .await?;

        if output.trim().is_empty() || output.trim() == "[]" {
            return Ok(Vec::new());
        }

        let instances: Vec<InstanceRecord> = serde_json::from_str(&output)?;
        Ok(instances)
    }

    /// Fetch a single instance, including its label fingerprint.
    pub async fn describe_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<InstanceRecord> {
        let result = self
            .run(&[
                "compute",
                "instances",
                "describe",
                name,
                "--project",
                project,
                "--zone",
                zone,
                "--format=json",
            ])
            .await;

        let output = match result {
            Ok(output) => output,
            // gcloud reports missing resources on stderr with a non-zero exit
            Err(GceError::CommandFailed(msg)) if msg.contains("not found") => {
                return Err(GceError::InstanceNotFound(name.to_string()));
            }
            Err(e) => return Err(e),
        };

        let instance: InstanceRecord = serde_json::from_str(&output)?;
        Ok(instance)
    }

    /// Create an instance. Returns the insert operation.
    pub async fn create_instance(
        &self,
        project: &str,
        zone: &str,
        spec: &InstanceSpec,
    ) -> Result<OperationInfo> {
        // Store string conversions to extend their lifetime
        let disk_size = format!("{}GB", spec.boot_disk_size_gb);
        let labels = spec
            .labels
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        let tags = spec.network_tags.join(",");
        let metadata = spec
            .startup_script
            .as_ref()
            .map(|script| format!("startup-script={script}"));

        let mut args = vec![
            "compute",
            "instances",
            "create",
            spec.name.as_str(),
            "--project",
            project,
            "--zone",
            zone,
            "--machine-type",
            spec.machine_type.as_str(),
            "--image",
            spec.image.as_str(),
            "--image-project",
            spec.image_project.as_str(),
            "--boot-disk-size",
            disk_size.as_str(),
            "--boot-disk-type",
            spec.disk_type.as_str(),
            "--boot-disk-auto-delete",
            "--network",
            super::provider::NETWORK,
            "--subnet",
            super::provider::SUBNET,
            "--maintenance-policy",
            "MIGRATE",
            "--no-restart-on-failure",
            "--async",
            "--format=json",
        ];

        if !labels.is_empty() {
            args.push("--labels");
            args.push(labels.as_str());
        }

        if !tags.is_empty() {
            args.push("--tags");
            args.push(tags.as_str());
        }

        if let Some(ref metadata) = metadata {
            args.push("--metadata");
            args.push(metadata.as_str());
        }

        let output = self.run(&args).await?;
        parse_operation(&output)
    }

    /// Start a stopped instance.
    pub async fn start_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<OperationInfo> {
        let output = self
            .run(&[
                "compute",
                "instances",
                "start",
                name,
                "--project",
                project,
                "--zone",
                zone,
                "--async",
                "--format=json",
            ])
            .await?;
        parse_operation(&output)
    }

    /// Stop a running instance.
    pub async fn stop_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<OperationInfo> {
        let output = self
            .run(&[
                "compute",
                "instances",
                "stop",
                name,
                "--project",
                project,
                "--zone",
                zone,
                "--async",
                "--format=json",
            ])
            .await?;
        parse_operation(&output)
    }

    /// Delete an instance together with its boot disk.
    pub async fn delete_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<OperationInfo> {
        let output = self
            .run(&[
                "compute",
                "instances",
                "delete",
                name,
                "--project",
                project,
                "--zone",
                zone,
                "--delete-disks=all",
                "--async",
                "--format=json",
            ])
            .await?;
        parse_operation(&output)
    }

    /// Change the machine type of a stopped instance.
    pub async fn set_machine_type(
        &self,
        project: &str,
        zone: &str,
        name: &str,
        machine_type: &str,
    ) -> Result<OperationInfo> {
        let output = self
            .run(&[
                "compute",
                "instances",
                "set-machine-type",
                name,
                "--project",
                project,
                "--zone",
                zone,
                "--machine-type",
                machine_type,
                "--async",
                "--format=json",
            ])
            .await?;
        parse_operation(&output)
    }

    /// Show the provider's own instance table.
    pub async fn print_instances(&self, project: &str, zone: Option<&str>) -> Result<()> {
        let mut args = vec!["compute", "instances", "list", "--project", project];

        let zones = zone.map(|z| format!("--zones={z}"));
        if let Some(ref zones) = zones {
            args.push(zones.as_str());
        }

        self.run_passthrough(&args).await
    }

    /// Show the machine types available in a zone.
    pub async fn print_machine_types(&self, zone: &str) -> Result<()> {
        let filter = format!("--filter=zone:{zone}");
        self.run_passthrough(&["compute", "machine-types", "list", filter.as_str()])
            .await
    }

    /// Recursively copy a local directory onto an instance.
    pub async fn scp_to_instance(
        &self,
        project: &str,
        zone: &str,
        src: &str,
        instance: &str,
        dest: &str,
    ) -> Result<()> {
        let target = format!("{instance}:{dest}");
        self.run_passthrough(&[
            "compute",
            "scp",
            "--recurse",
            src,
            target.as_str(),
            "--project",
            project,
            "--zone",
            zone,
        ])
        .await
    }

    /// Mint a short-lived access token for the Compute REST API.
    pub async fn access_token(&self) -> Result<String> {
        let output = Command::new("gcloud")
            .args(["auth", "print-access-token"])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GceError::TokenFailed(stderr.trim().to_string()));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(GceError::TokenFailed(
                "gcloud returned an empty token".to_string(),
            ));
        }
        Ok(token)
    }
}

impl Default for Gcloud {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an operation resource from gcloud output. `instances create` emits a
/// single-element JSON array; the other mutations emit a bare object.
fn parse_operation(output: &str) -> Result<OperationInfo> {
    if let Ok(op) = serde_json::from_str::<OperationInfo>(output) {
        return Ok(op);
    }

    let ops: Vec<OperationInfo> = serde_json::from_str(output)?;
    ops.into_iter()
        .next()
        .ok_or_else(|| GceError::CommandFailed("gcloud returned no operation".to_string()))
}
