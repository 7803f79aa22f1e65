use super::{TargetArgs, RSTUDIO_PORT};
use clap::Args;
use colored::Colorize;
use labgcp_cloud_gce::{render_startup_script, GceProvider};
use labgcp_config::Settings;
use labgcp_core::{CreateRequest, InstanceManager};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Password to use for RStudio Server.
    #[arg(long)]
    pub rpass: String,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Machine type for the new instance.
    #[arg(long)]
    pub machine_type: Option<String>,

    /// Boot disk size in GB.
    #[arg(long)]
    pub boot_disk_size: Option<i64>,
}

pub async fn handle(
    provider: GceProvider,
    settings: &Settings,
    project: &str,
    args: CreateArgs,
) -> anyhow::Result<()> {
    let (user, instance, zone) = args.target.resolve(settings)?;
    let machine_type = args
        .machine_type
        .unwrap_or_else(|| settings.machine_type.clone());
    let boot_disk_size_gb = args.boot_disk_size.unwrap_or(settings.boot_disk_size_gb);
    let startup_script = render_startup_script(&user, &args.rpass);

    println!(
        "{}",
        "Creating instance; this may take a minute...".blue()
    );

    let manager = InstanceManager::new(provider, project, &zone, settings.max_instances);
    let request = CreateRequest {
        user,
        instance,
        machine_type,
        boot_disk_size_gb,
        image: settings.image.clone(),
        image_project: settings.image_project().to_string(),
        startup_script: Some(startup_script),
    };
    let outcome = manager.create(&request).await?;

    println!();
    println!(
        "{}",
        format!("Your instance {} has been created.", outcome.name)
            .green()
            .bold()
    );
    println!(
        "You can access RStudio Server at {}.",
        format!("http://{}:{}", outcome.address, RSTUDIO_PORT).cyan()
    );
    Ok(())
}
