//! Taxing Solutions portal server

use clap::Parser;
use std::path::PathBuf;
use taxing_core::{init_logging, PortalConfig};
use taxing_web::PortalServerBuilder;
use tracing::{error, info};

/// Taxing Solutions portal - marketing site and role-gated dashboards
#[derive(Parser)]
#[command(name = "taxing-web")]
#[command(about = "Web portal for Taxing Solutions")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Backend base URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = match PortalConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut logging = config.logging.clone();
    if let Some(level) = &args.log_level {
        logging = logging.with_level(level);
    }
    if let Err(e) = init_logging(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let mut builder = PortalServerBuilder::with_config(config);
    if let Some(host) = args.host {
        builder = builder.host(host);
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(url) = args.backend_url {
        builder = builder.backend_url(url);
    }
    if args.dev {
        builder = builder.dev_mode(true);
    }

    let server = match builder.build() {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to build server: {}", e);
            eprintln!("Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }

    info!("Server shut down gracefully");
}
