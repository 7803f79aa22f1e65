use super::TargetArgs;
use crate::prompt;
use clap::Args;
use colored::Colorize;
use labgcp_cloud_gce::GceProvider;
use labgcp_config::Settings;
use labgcp_core::{canonical_name, InstanceManager};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn handle(
    provider: GceProvider,
    settings: &Settings,
    project: &str,
    args: DeleteArgs,
) -> anyhow::Result<()> {
    let (user, instance, zone) = args.target.resolve(settings)?;
    let name = canonical_name(&instance, &user);

    let question = format!(
        "Are you sure you want to delete instance {name}? \
         The corresponding boot disk will also be deleted."
    );
    if !prompt::confirm(&question)? {
        println!("{}", "Deletion cancelled.".yellow());
        return Ok(());
    }

    let manager = InstanceManager::new(provider, project, &zone, settings.max_instances);
    let name = manager.delete(&user, &instance).await?;

    println!(
        "{}",
        format!("Your instance {name} is being deleted. This may take a minute.").yellow()
    );
    Ok(())
}
