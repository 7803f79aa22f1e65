use super::TargetArgs;
use clap::Args;
use colored::Colorize;
use labgcp_cloud_gce::GceProvider;
use labgcp_config::Settings;
use labgcp_core::InstanceManager;

#[derive(Args, Debug)]
pub struct SetMachineTypeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Machine type to set. See `lab-gcp list-machine-types` for options.
    #[arg(long)]
    pub machine_type: Option<String>,
}

pub async fn handle_set(
    provider: GceProvider,
    settings: &Settings,
    project: &str,
    args: SetMachineTypeArgs,
) -> anyhow::Result<()> {
    let (user, instance, zone) = args.target.resolve(settings)?;
    let machine_type = args
        .machine_type
        .unwrap_or_else(|| settings.machine_type.clone());

    let manager = InstanceManager::new(provider, project, &zone, settings.max_instances);
    let name = manager
        .set_machine_type(&user, &instance, &machine_type)
        .await?;

    println!(
        "{}",
        format!("The machine type of your instance {name} has been updated to {machine_type}.")
            .green()
    );
    Ok(())
}

#[derive(Args, Debug)]
pub struct ListMachineTypesArgs {
    /// Compute zone.
    #[arg(long)]
    pub zone: Option<String>,
}

pub async fn handle_list(
    provider: GceProvider,
    settings: &Settings,
    args: ListMachineTypesArgs,
) -> anyhow::Result<()> {
    let zone = args.zone.unwrap_or_else(|| settings.zone.clone());
    provider.gcloud().print_machine_types(&zone).await?;

    println!();
    println!("To specify a custom machine type, use the format custom-CPUS-MEMORY, where");
    println!("CPUS is 1 or an even number up to 32 (2, 4, 6, ...) and MEMORY is the total");
    println!("memory, a multiple of 256 MB supplied in MB (5 GB of memory is 5120).");
    println!("For example: custom-4-5120");
    Ok(())
}
