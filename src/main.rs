//! native-compat CLI
//!
//! `upload` records the native versions a bundle was built against;
//! `compatibility` compares them with the current local project.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

use native_compat::compat::render_table;
use native_compat::config::{CompatConfig, ConfigError};
use native_compat::executor::{CompatExecutor, ReportError};
use native_compat::providers::{BundleStore, PackageJsonManifest};
use native_compat::upload::{upload, UploadError, UploadRequest};

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),
    #[error("Compatibility check failed: {0}")]
    Report(#[from] ReportError),
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "native-compat", version, about = "Native dependency compatibility for uploaded bundles")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Local package.json (overrides config)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Bundle store file (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Only consider packages with android/ or ios/ sources in node_modules
    #[arg(long, global = true)]
    native_only: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a bundle and its native dependency snapshot on a channel
    Upload {
        /// Bundle version
        #[arg(short, long)]
        bundle: String,

        /// Target channel
        #[arg(short, long)]
        channel: String,

        /// Keep the channel's previous snapshot instead of recomputing it
        #[arg(long)]
        ignore_metadata_check: bool,
    },

    /// Compare the channel's latest bundle with the local project
    Compatibility {
        /// Channel to check
        #[arg(short, long)]
        channel: String,

        /// Print rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

async fn resolve_config(cli: &Cli) -> Result<CompatConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => CompatConfig::load(path).await?,
        None => CompatConfig::default(),
    };
    if let Some(path) = &cli.manifest {
        config = config.with_manifest_path(path);
    }
    if let Some(path) = &cli.store {
        config = config.with_store_path(path);
    }
    if cli.native_only {
        config = config.with_native_only(true);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(&cli).await?;
    let store = BundleStore::new(&config.store_path);
    let manifest =
        PackageJsonManifest::new(&config.manifest_path).with_native_only(config.native_only);

    match cli.command {
        Command::Upload {
            bundle,
            channel,
            ignore_metadata_check,
        } => {
            let request = UploadRequest {
                bundle,
                channel,
                ignore_metadata_check,
            };
            let record = upload(&store, &manifest, request, &config.alias_table()).await?;
            println!(
                "Bundle uploaded: {} on channel '{}' ({} native packages)",
                record.bundle,
                record.channel,
                record.native_packages.len()
            );
        }
        Command::Compatibility { channel, json } => {
            let executor = CompatExecutor::new(config.concurrency_limit)
                .with_aliases(config.alias_table())
                .with_timeout(config.io_timeout());
            let report = executor.execute(&store, &manifest, &channel).await?;

            // Informational only: the exit status ignores the verdicts.
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_table(&report));
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
