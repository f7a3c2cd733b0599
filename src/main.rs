mod config;

use anyhow::Context;
use asset_client::{AssetBackend, MemoryStore};
use clap::Parser;
use snapshot_apis::Snapshot;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Parser)]
struct Args {
    /// Problem package: directory, `.zip` or `.tar.gz` archive
    #[clap(long)]
    package: PathBuf,
    /// YAML file describing asset and blob services
    #[clap(long)]
    config: Option<PathBuf>,
    /// Where to write snapshot, stdout by default
    #[clap(long)]
    output: Option<PathBuf>,
    /// Keep uploads in memory instead of sending them to services
    #[clap(long)]
    dry_run: bool,
}

async fn create_clients(
    args: &Args,
) -> anyhow::Result<(importer::Clients, package_loader::LoaderConfig)> {
    if args.dry_run {
        tracing::info!("dry run, uploads are kept in memory");
        let store = Arc::new(MemoryStore::new());
        let clients = importer::Clients {
            assets: AssetBackend::Direct(store.clone()),
            blobs: store,
        };
        return Ok((clients, Default::default()));
    }
    let path = args
        .config
        .as_ref()
        .context("--config is required unless --dry-run is given")?;
    let config = config::Config::load(path).await?;
    let clients = importer::Clients {
        assets: config.asset_backend(),
        blobs: config.blob_backend(),
    };
    Ok((clients, config.workspace))
}

async fn import(package: &Path, clients: &importer::Clients) -> anyhow::Result<Snapshot> {
    let spec = package_spec::load(package).await?;
    let snapshot = importer::snapshot(&spec, package, clients).await?;
    Ok(snapshot)
}

async fn write_snapshot(snapshot: &Snapshot, output: Option<&Path>) -> anyhow::Result<()> {
    let mut data = serde_json::to_vec_pretty(snapshot).context("failed to serialize snapshot")?;
    data.push(b'\n');
    match output {
        Some(path) => tokio::fs::write(path, data)
            .await
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&data).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let (clients, loader_config) = create_clients(&args)
        .await
        .context("failed to initialize service clients")?;
    let loader = package_loader::Loader::from_config(&loader_config)
        .await
        .context("failed to initialize package loader")?;

    let workspace = loader
        .load(&args.package)
        .await
        .context("failed to prepare package")?;
    let res = import(workspace.path(), &clients).await;
    workspace.release();
    let snapshot = res.with_context(|| format!("failed to import {}", args.package.display()))?;

    tracing::info!(problem = %snapshot.problem.short_name, "import finished");
    write_snapshot(&snapshot, args.output.as_deref()).await
}
