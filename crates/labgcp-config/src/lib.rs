//! Settings for the lab-gcp CLI
//!
//! Settings are loaded once at process start and passed by reference into
//! every command handler; nothing in the workspace reads ambient config
//! state after startup. A missing settings file yields the lab defaults.

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "lab-gcp";
const CONFIG_FILE: &str = "config.json";

/// Lab-wide defaults plus per-user overrides from the settings file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// User name associated with created instances.
    pub user: String,

    /// GCP project ID.
    pub project: String,

    /// Compute zone.
    pub zone: String,

    /// Short instance name before the owner suffix is applied.
    pub instance_name: String,

    /// Default machine type for new instances.
    pub machine_type: String,

    /// Boot disk size in GB.
    pub boot_disk_size_gb: i64,

    /// Custom image to boot from.
    pub image: String,

    /// Project hosting the image. Empty means the same project as `project`.
    pub image_project: String,

    /// Default bucket for library uploads.
    pub bucket: String,

    /// Local directory holding sequencing libraries.
    pub library_dir: String,

    /// Maximum number of instances a single user may own at once.
    pub max_instances: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user: std::env::var("USER").unwrap_or_default(),
            project: String::new(),
            zone: "us-central1-f".to_string(),
            instance_name: "rstudio-sc".to_string(),
            machine_type: "n1-highmem-8".to_string(),
            boot_disk_size_gb: 200,
            image: "rstudio-sc-basic".to_string(),
            image_project: String::new(),
            bucket: "macosko_data".to_string(),
            library_dir: "/broad/macosko/data/libraries".to_string(),
            max_instances: 2,
        }
    }
}

impl Settings {
    /// Load settings from the default location. A missing file is not an
    /// error; the defaults apply.
    pub fn load() -> Result<Self> {
        let path = settings_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load settings from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// The project that hosts the boot image.
    pub fn image_project(&self) -> &str {
        if self.image_project.is_empty() {
            &self.project
        } else {
            &self.image_project
        }
    }

    /// The effective project, preferring an explicit CLI override.
    pub fn resolve_project(&self, flag: Option<&str>) -> Result<String> {
        match flag {
            Some(p) => Ok(p.to_string()),
            None if !self.project.is_empty() => Ok(self.project.clone()),
            None => {
                let shown = settings_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| CONFIG_FILE.to_string());
                Err(ConfigError::ProjectNotSet(shown))
            }
        }
    }
}

/// Path of the settings file: `$LAB_GCP_CONFIG` if set, otherwise
/// `~/.config/lab-gcp/config.json`.
pub fn settings_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("LAB_GCP_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join(CONFIG_DIR);

    Ok(config_dir.join(CONFIG_FILE))
}
