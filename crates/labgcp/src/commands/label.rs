use super::TargetArgs;
use clap::Args;
use colored::Colorize;
use labgcp_cloud_gce::GceProvider;
use labgcp_config::Settings;
use labgcp_core::InstanceManager;

#[derive(Args, Debug)]
pub struct SetTimeLabelArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Turn time-management off (the instance stays on past midnight).
    #[arg(long)]
    pub turn_off: bool,
}

pub async fn handle(
    provider: GceProvider,
    settings: &Settings,
    project: &str,
    args: SetTimeLabelArgs,
) -> anyhow::Result<()> {
    let (user, instance, zone) = args.target.resolve(settings)?;

    let manager = InstanceManager::new(provider, project, &zone, settings.max_instances);
    let (name, value) = manager
        .set_time_label(&user, &instance, !args.turn_off)
        .await?;

    println!(
        "{}",
        format!("Your instance {name} has been set to {value}.").green()
    );
    Ok(())
}
