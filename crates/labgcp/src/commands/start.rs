use super::{TargetArgs, RSTUDIO_PORT};
use clap::Args;
use colored::Colorize;
use labgcp_cloud_gce::GceProvider;
use labgcp_config::Settings;
use labgcp_core::InstanceManager;

#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn handle(
    provider: GceProvider,
    settings: &Settings,
    project: &str,
    args: StartArgs,
) -> anyhow::Result<()> {
    let (user, instance, zone) = args.target.resolve(settings)?;

    let manager = InstanceManager::new(provider, project, &zone, settings.max_instances);
    let outcome = manager.start(&user, &instance).await?;

    println!(
        "{}",
        format!("Your instance {} is being started.", outcome.name).green()
    );
    println!(
        "You can access RStudio Server at {}.",
        format!("http://{}:{}", outcome.address, RSTUDIO_PORT).cyan()
    );
    Ok(())
}
