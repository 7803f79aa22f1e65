use clap::Args;
use labgcp_cloud_gce::GceProvider;
use labgcp_config::Settings;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show only instances in this zone.
    #[arg(long)]
    pub zone: Option<String>,
}

pub async fn handle(
    provider: GceProvider,
    _settings: &Settings,
    project: &str,
    args: ListArgs,
) -> anyhow::Result<()> {
    // The provider's own table output is the most useful view here.
    provider
        .gcloud()
        .print_instances(project, args.zone.as_deref())
        .await?;
    Ok(())
}
