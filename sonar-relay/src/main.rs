use std::path::PathBuf;

use clap::Parser;
use sonar_core::Channel;
use sonar_relay::{Config, Forwarder, HttpUplink};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "sonar-relay")]
#[command(about = "Secondary rangefinder node: polls local sensors and pushes them to the hub")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "sonar-relay.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "sonar_relay=info,sonar_edge=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    info!(
        hub_url = %config.hub.url,
        front = ?config.sensors.front,
        back = ?config.sensors.back,
        "Starting sonar-relay"
    );

    let links = vec![
        config.sensors.front.open_link(Channel::Front, &config.link)?,
        config.sensors.back.open_link(Channel::Back, &config.link)?,
    ];

    let uplink = HttpUplink::new(&config.hub.url, config.hub.request_timeout())?;
    let forwarder = Forwarder::new(
        links,
        uplink,
        config.hub.push_interval(),
        config.node.cycle_pause(),
    );

    let cancel = CancellationToken::new();
    let forwarder_handle = tokio::spawn(forwarder.run(cancel.clone()));

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down...");

    cancel.cancel();
    let _ = forwarder_handle.await;

    info!("sonar-relay shut down complete");
    Ok(())
}
