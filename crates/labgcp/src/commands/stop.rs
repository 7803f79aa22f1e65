use super::TargetArgs;
use clap::Args;
use colored::Colorize;
use labgcp_cloud_gce::GceProvider;
use labgcp_config::Settings;
use labgcp_core::InstanceManager;

#[derive(Args, Debug)]
pub struct StopArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn handle(
    provider: GceProvider,
    settings: &Settings,
    project: &str,
    args: StopArgs,
) -> anyhow::Result<()> {
    let (user, instance, zone) = args.target.resolve(settings)?;

    let manager = InstanceManager::new(provider, project, &zone, settings.max_instances);
    let name = manager.stop(&user, &instance).await?;

    println!(
        "{}",
        format!("Your instance {name} is being stopped. This may take a minute.").yellow()
    );
    Ok(())
}
