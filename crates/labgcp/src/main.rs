mod commands;
mod prompt;

use clap::{Parser, Subcommand};
use labgcp_cloud_gce::GceProvider;
use labgcp_config::Settings;

#[derive(Parser)]
#[command(name = "lab-gcp")]
#[command(about = "Manage the lab's cloud instances and storage for single-cell analysis", long_about = None)]
struct Cli {
    /// Project ID (defaults to the configured project).
    #[arg(long, global = true)]
    project: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an instance with the specified parameters
    CreateInstance(commands::create::CreateArgs),
    /// List instances
    ListInstances(commands::list::ListArgs),
    /// Stop a running instance
    StopInstance(commands::stop::StopArgs),
    /// Delete an instance together with its boot disk
    DeleteInstance(commands::delete::DeleteArgs),
    /// Start a stopped instance
    StartInstance(commands::start::StartArgs),
    /// Set the machine type of a stopped instance
    SetMachineType(commands::machine_type::SetMachineTypeArgs),
    /// List available machine types for a zone
    ListMachineTypes(commands::machine_type::ListMachineTypesArgs),
    /// Toggle the time-managed label on an instance
    SetTimeLabel(commands::label::SetTimeLabelArgs),
    /// Upload one or more single-cell count libraries to the bucket
    UploadLibs(commands::upload::UploadLibsArgs),
    /// Upload a local directory to an instance
    UploadDirInstance(commands::upload::UploadDirArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    let provider = GceProvider::new();

    // upload-libs only talks to gsutil; everything else needs gcloud
    if !matches!(cli.command, Commands::UploadLibs(_)) {
        provider.check_installed().await?;
    }

    match cli.command {
        Commands::CreateInstance(args) => {
            let project = settings.resolve_project(cli.project.as_deref())?;
            commands::create::handle(provider, &settings, &project, args).await
        }
        Commands::ListInstances(args) => {
            let project = settings.resolve_project(cli.project.as_deref())?;
            commands::list::handle(provider, &settings, &project, args).await
        }
        Commands::StopInstance(args) => {
            let project = settings.resolve_project(cli.project.as_deref())?;
            commands::stop::handle(provider, &settings, &project, args).await
        }
        Commands::DeleteInstance(args) => {
            let project = settings.resolve_project(cli.project.as_deref())?;
            commands::delete::handle(provider, &settings, &project, args).await
        }
        Commands::StartInstance(args) => {
            let project = settings.resolve_project(cli.project.as_deref())?;
            commands::start::handle(provider, &settings, &project, args).await
        }
        Commands::SetMachineType(args) => {
            let project = settings.resolve_project(cli.project.as_deref())?;
            commands::machine_type::handle_set(provider, &settings, &project, args).await
        }
        Commands::ListMachineTypes(args) => {
            commands::machine_type::handle_list(provider, &settings, args).await
        }
        Commands::SetTimeLabel(args) => {
            let project = settings.resolve_project(cli.project.as_deref())?;
            commands::label::handle(provider, &settings, &project, args).await
        }
        Commands::UploadLibs(args) => commands::upload::handle_libs(&settings, args).await,
        Commands::UploadDirInstance(args) => {
            let project = settings.resolve_project(cli.project.as_deref())?;
            commands::upload::handle_dir(provider, &settings, &project, args).await
        }
    }
}
