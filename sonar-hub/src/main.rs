use std::path::PathBuf;

use clap::Parser;
use sonar_core::Channel;
use sonar_hub::api;
use sonar_hub::{AggregateStore, Aggregator, AppState, Config, LogDisplay};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "sonar-hub")]
#[command(about = "Primary rangefinder node: polls local sensors and serves the aggregate")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "sonar-hub.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "sonar_hub=info,sonar_edge=info".to_owned());
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
        http_addr = %config.server.http_addr,
        left = ?config.sensors.left,
        right = ?config.sensors.right,
        "Starting sonar-hub"
    );

    let links = vec![
        config.sensors.left.open_link(Channel::Left, &config.link)?,
        config.sensors.right.open_link(Channel::Right, &config.link)?,
    ];

    let store = AggregateStore::new();
    let aggregator = Aggregator::new(
        links,
        store.clone(),
        Box::new(LogDisplay),
        config.display.refresh_interval(),
        config.node.cycle_pause(),
    )?;

    let cancel = CancellationToken::new();
    let aggregator_handle = tokio::spawn(aggregator.run(cancel.clone()));

    // HTTP server
    let http_addr = config.server.http_addr;
    let axum_app = api::app(AppState { store });
    let axum_listener = TcpListener::bind(http_addr).await?;
    info!(%http_addr, "HTTP server listening");

    let cancel_for_http = cancel.clone();

    tokio::select! {
        result = axum::serve(axum_listener, axum_app).with_graceful_shutdown(async move {
            cancel_for_http.cancelled().await;
        }) => {
            if let Err(e) = result {
                error!(error = ?e, "HTTP server error");
            }
            info!("HTTP server shut down");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    cancel.cancel();
    let _ = aggregator_handle.await;

    info!("sonar-hub shut down complete");
    Ok(())
}
