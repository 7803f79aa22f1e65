use super::TargetArgs;
use clap::Args;
use colored::Colorize;
use labgcp_cloud_gce::{GceProvider, Gsutil};
use labgcp_config::Settings;
use labgcp_core::canonical_name;
use std::path::Path;

#[derive(Args, Debug)]
pub struct UploadLibsArgs {
    /// Name of a library (not a full path) under the library directory, or
    /// path to a file listing library names one per line.
    #[arg(long)]
    pub libraries: String,

    /// Bucket to upload libraries to.
    #[arg(long)]
    pub bucket: Option<String>,

    /// Local directory where libraries are stored.
    #[arg(long)]
    pub library_dir: Option<String>,
}

pub async fn handle_libs(settings: &Settings, args: UploadLibsArgs) -> anyhow::Result<()> {
    let bucket = args.bucket.unwrap_or_else(|| settings.bucket.clone());
    let library_dir = args
        .library_dir
        .unwrap_or_else(|| settings.library_dir.clone());

    let gsutil = Gsutil::new();
    gsutil.check_installed().await?;

    let libraries: Vec<String> = if Path::new(&library_dir).join(&args.libraries).is_dir() {
        vec![args.libraries.clone()]
    } else if Path::new(&args.libraries).is_file() {
        println!("Reading libraries from file.");
        std::fs::read_to_string(&args.libraries)?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    } else {
        anyhow::bail!(
            "--libraries must name a library directory under {library_dir} or a file listing libraries."
        );
    };

    for lib in &libraries {
        // Library names carry a flowcell prefix before the first underscore.
        let short = lib.split_once('_').map(|(_, rest)| rest).unwrap_or("");
        let lib_path = Path::new(&library_dir).join(lib);

        if lib_path.join("outs").is_dir() {
            println!("{}", format!("Uploading 10x library {lib}...").blue());
            gsutil.upload_library_10x(&library_dir, lib, &bucket).await?;
        } else if !short.is_empty() && lib_path.join(format!("{short}.bam")).is_file() {
            println!("{}", format!("Uploading library {lib}...").blue());
            gsutil.upload_library_flat(&library_dir, lib, &bucket).await?;
        } else {
            eprintln!(
                "{}",
                format!("Library {lib} does not have a recognized output layout; skipping.")
                    .yellow()
            );
        }
    }

    Ok(())
}

#[derive(Args, Debug)]
pub struct UploadDirArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Local directory to upload.
    #[arg(long)]
    pub src: String,

    /// Destination path on the instance.
    #[arg(long, default_value = "~")]
    pub dest: String,
}

pub async fn handle_dir(
    provider: GceProvider,
    settings: &Settings,
    project: &str,
    args: UploadDirArgs,
) -> anyhow::Result<()> {
    let (user, instance, zone) = args.target.resolve(settings)?;
    let name = canonical_name(&instance, &user);

    println!(
        "{}",
        format!("Uploading {} to {name}:{}...", args.src, args.dest).blue()
    );

    provider
        .gcloud()
        .scp_to_instance(project, &zone, &args.src, &name, &args.dest)
        .await?;

    println!("{}", "Upload complete.".green());
    Ok(())
}
