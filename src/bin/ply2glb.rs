//! Service binary for ply2glb.
//!
//! A thin shim over the library crate: parses flags, initialises logging,
//! constructs the storage client once, and serves the router.

use anyhow::{Context, Result};
use clap::Parser;
use google_cloud_storage::client::{Client, ClientConfig};
use ply2glb::{AppContext, GcsStore, ServiceConfig};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Convert PLY point clouds to GLB meshes via PDAL, served over HTTP.
#[derive(Debug, Parser)]
#[command(name = "ply2glb", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8000", env = "PLY2GLB_LISTEN")]
    listen: SocketAddr,

    /// Destination GCS bucket for converted artifacts.
    #[arg(long, env = "GCS_BUCKET")]
    bucket: String,

    /// Object-key prefix inside the bucket.
    #[arg(long, default_value = "conversions", env = "PLY2GLB_KEY_PREFIX")]
    key_prefix: String,

    /// Name or path of the PDAL binary.
    #[arg(long, default_value = "pdal", env = "PLY2GLB_PDAL_BIN")]
    pdal_bin: String,

    /// Parent directory for request workspaces (default: system temp dir).
    #[arg(long, env = "PLY2GLB_WORKSPACE_ROOT")]
    workspace_root: Option<PathBuf>,

    /// Timeout for downloading the source point cloud, in seconds.
    #[arg(long, default_value_t = 120, env = "PLY2GLB_DOWNLOAD_TIMEOUT_SECS")]
    download_timeout_secs: u64,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Configuration ────────────────────────────────────────────────────
    let mut builder = ServiceConfig::builder()
        .bucket(&cli.bucket)
        .key_prefix(&cli.key_prefix)
        .pdal_bin(&cli.pdal_bin)
        .download_timeout_secs(cli.download_timeout_secs);
    if let Some(root) = &cli.workspace_root {
        builder = builder.workspace_root(root);
    }
    let config = builder.build().context("invalid service configuration")?;

    // ── Storage client (once, from ambient credentials) ──────────────────
    let gcs_config = ClientConfig::default()
        .with_auth()
        .await
        .context("failed to authenticate with Google Cloud Storage")?;
    let store = GcsStore::new(Client::new(gcs_config), &cli.bucket);

    // ── Serve ────────────────────────────────────────────────────────────
    let ctx = AppContext::new(config, Arc::new(store)).context("failed to build app context")?;
    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("cannot bind {}", cli.listen))?;
    ply2glb::server::run(listener, ctx)
        .await
        .context("server terminated")?;

    Ok(())
}
