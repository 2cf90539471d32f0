//! docker-dns binary entry point.

use clap::Parser;
use docker_dns::{telemetry, Config, DnsServer, DockerClient};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// DNS server for a custom .docker TLD backed by live container state.
#[derive(Parser, Debug)]
#[command(name = "docker-dns")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML).
    #[arg(short, long, default_value = "docker-dns.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration; a missing file falls back to defaults plus env.
    let config: Config = config::Config::builder()
        .add_source(config::File::from(args.config.clone()).required(false))
        .add_source(
            config::Environment::with_prefix("DOCKER_DNS")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    // Initialize telemetry
    telemetry::init(&config.telemetry).map_err(|e| e as Box<dyn std::error::Error>)?;

    info!(
        config_file = %args.config.display(),
        bind_port = config.dns.bind_port,
        docker_url = %config.docker.docker_url,
        "Starting docker-dns"
    );

    // Setup graceful shutdown on SIGINT
    let shutdown = CancellationToken::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            signal_shutdown.cancel();
        }
    });

    // Run DNS server
    let client = DockerClient::new(&config.docker.docker_url)?;
    let server = DnsServer::new(config.dns, Arc::new(client));
    let result = server.run(shutdown).await;

    if let Err(e) = result {
        error!("DNS server error: {}", e);
        return Err(e.into());
    }

    info!("docker-dns shutdown complete");
    Ok(())
}
