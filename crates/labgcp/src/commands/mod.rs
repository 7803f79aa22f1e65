pub mod create;
pub mod delete;
pub mod label;
pub mod list;
pub mod machine_type;
pub mod start;
pub mod stop;
pub mod upload;

use clap::Args;
use labgcp_config::Settings;

/// Port RStudio Server listens on inside the instances.
pub const RSTUDIO_PORT: u16 = 8787;

/// Flags shared by every instance-targeting command.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// User name to associate with the instance.
    #[arg(long)]
    pub user: Option<String>,

    /// Name of the instance (the owner suffix is applied automatically).
    #[arg(long)]
    pub instance: Option<String>,

    /// Compute zone.
    #[arg(long)]
    pub zone: Option<String>,
}

impl TargetArgs {
    /// Fill in missing flags from the settings file.
    pub fn resolve(&self, settings: &Settings) -> anyhow::Result<(String, String, String)> {
        let user = self.user.clone().unwrap_or_else(|| settings.user.clone());
        if user.is_empty() {
            anyhow::bail!("No user configured. Pass --user or set \"user\" in the settings file.");
        }
        let instance = self
            .instance
            .clone()
            .unwrap_or_else(|| settings.instance_name.clone());
        let zone = self.zone.clone().unwrap_or_else(|| settings.zone.clone());
        Ok((user, instance, zone))
    }
}
