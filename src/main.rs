//! Disk Uploadr - multipart upload server with a static file root

use anyhow::Context;
use clap::Parser;
use disk_uploadr::config::Config;
use disk_uploadr::metrics::server::MetricsServer;
use disk_uploadr::server::bootstrap;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Disk Uploadr - stores multipart uploads on disk and serves a public directory
#[derive(Parser, Debug)]
#[command(name = "disk-uploadr")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides server.address
    #[arg(short, long)]
    address: Option<String>,

    /// Upload directory, overrides storage.upload_dir
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Directory served at `/`, overrides storage.public_dir
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load configuration from {:?}", path))?,
            None => Config::default(),
        };

        if let Some(address) = &self.address {
            config.server.address = address.clone();
        }
        if let Some(dir) = &self.upload_dir {
            config.storage.upload_dir = dir.clone();
        }
        if let Some(dir) = &self.public_dir {
            config.storage.public_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.load_config()?;

    let _metrics = if config.metrics.enabled {
        let mut server = MetricsServer::new(config.metrics.address.clone());
        server.start().await?;
        Some(server)
    } else {
        None
    };

    bootstrap::run(&config).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_target(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {}", e);
    }

    info!("Starting Disk Uploadr v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
