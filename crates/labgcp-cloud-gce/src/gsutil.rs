//! gsutil CLI wrapper
//!
//! Bucket uploads go through gsutil rather than the storage API: the API has
//! no recursive upload, and gsutil reports transfer progress directly on the
//! user's console. Calls therefore run with inherited stdio.

use crate::error::{GceError, Result};
use tokio::process::Command;

/// gsutil CLI wrapper
pub struct Gsutil;

impl Gsutil {
    pub fn new() -> Self {
        Self
    }

    /// Check that gsutil is on PATH.
    pub async fn check_installed(&self) -> Result<()> {
        let which = Command::new("which").arg("gsutil").output().await?;

        if !which.status.success() {
            return Err(GceError::GsutilNotFound);
        }
        Ok(())
    }

    async fn run(&self, args: &[&str]) -> Result<()> {
        tracing::debug!("Running: gsutil {}", args.join(" "));

        let status = Command::new("gsutil").args(args).status().await?;

        if !status.success() {
            return Err(GceError::CommandFailed(format!(
                "gsutil exited with {status}"
            )));
        }
        Ok(())
    }

    /// Copy a single object into the bucket.
    pub async fn cp(&self, src: &str, dest: &str) -> Result<()> {
        self.run(&["cp", src, dest]).await
    }

    /// Recursively copy a directory into the bucket.
    pub async fn cp_recursive(&self, src: &str, dest: &str) -> Result<()> {
        self.run(&["cp", "-r", src, dest]).await
    }

    /// Upload a 10x count library: the raw/filtered matrices in both h5 and
    /// directory form, under `libraries/<lib>/outs/` in the bucket.
    pub async fn upload_library_10x(
        &self,
        library_dir: &str,
        library: &str,
        bucket: &str,
    ) -> Result<()> {
        let bucket = bucket_uri(bucket);
        let outs = format!("{library_dir}/{library}/outs");
        let dest = format!("{bucket}/libraries/{library}/outs/");

        self.cp(&format!("{outs}/raw_feature_bc_matrix.h5"), &dest)
            .await?;
        self.cp(&format!("{outs}/filtered_feature_bc_matrix.h5"), &dest)
            .await?;
        self.cp_recursive(&format!("{outs}/raw_feature_bc_matrix/"), &dest)
            .await?;
        self.cp_recursive(&format!("{outs}/filtered_feature_bc_matrix/"), &dest)
            .await?;
        Ok(())
    }

    /// Upload a flat-pipeline library directory as-is under `libraries/`.
    pub async fn upload_library_flat(
        &self,
        library_dir: &str,
        library: &str,
        bucket: &str,
    ) -> Result<()> {
        let bucket = bucket_uri(bucket);
        self.cp_recursive(
            &format!("{library_dir}/{library}"),
            &format!("{bucket}/libraries/"),
        )
        .await
    }
}

impl Default for Gsutil {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefix a bare bucket name with `gs://` if necessary.
pub fn bucket_uri(bucket: &str) -> String {
    if bucket.starts_with("gs://") {
        bucket.to_string()
    } else {
        format!("gs://{bucket}")
    }
}
