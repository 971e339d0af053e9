use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use saferoute::server::{AppState, router};
use saferoute::{Config, DatasetHandle, Engine, Position, RoadDataset};

/// Safe-route recommendation service.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GeoJSON road network, overrides `server.roads`.
    #[arg(long)]
    roads: Option<PathBuf>,

    /// Listen address, overrides `server.listen`.
    #[arg(long)]
    listen: Option<String>,

    /// Pin every query to `lon,lat` instead of the device position.
    #[arg(long, value_name = "LON,LAT")]
    debug_location: Option<Position>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // 1. Resolve configuration (file, then command line)
    let mut config = match &args.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(roads) = args.roads {
        config.server.roads = roads;
    }
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if args.debug_location.is_some() {
        config.server.debug_location = args.debug_location;
    }

    // 2. Load the road network
    let (dataset, report) = RoadDataset::from_path(&config.server.roads)
        .with_context(|| format!("Failed to load road network {}", config.server.roads.display()))?;
    if !report.skipped.is_empty() {
        tracing::warn!("{} road features were skipped", report.skipped.len());
    }

    match config.server.debug_location {
        Some(position) => tracing::info!("Debug mode: every query is pinned to {position}"),
        None => tracing::info!("Using device-reported positions"),
    }

    let state = Arc::new(AppState {
        dataset: DatasetHandle::new(dataset),
        engine: Engine::new(config.engine)?,
        roads: config.server.roads,
        debug_location: config.server.debug_location,
    });

    // 3. Serve
    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen))?;
    tracing::info!("API server running on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
