use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use balloonbot_core::platforms::afreeca::{AfreecaApi, AfreecaChatConnector};
use balloonbot_core::services::ChatSessionBridge;
use balloonbot_core::tasks::{LivePoller, PollerConfig};
use balloonbot_core::DefaultHttpClient;
use balloonbot_osc::BalloonNotifier;

mod config;
use config::{Args, BridgeConfig};

fn init_tracing() {
    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("balloonbot=info"));
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a missing .env is fine; BJ_ID may come from the real environment
    let _ = dotenv::dotenv();
    init_tracing();

    let args = Args::parse();
    let config = match BridgeConfig::from_env(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("Startup aborted: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "balloonbot starting. bj={}, osc={}:{}, poll={:?}",
        config.broadcaster_id, config.osc_host, config.osc_port, config.poll_interval
    );

    if let Err(e) = run(config).await {
        error!("Fatal: {:?}", e);
        return Err(e.into());
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

/// Composition root: builds every collaborator and hands them to the poller.
async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    let notifier = BalloonNotifier::connect(&config.osc_host, config.osc_port).await?;
    let http = DefaultHttpClient::new(config.http_timeout)?;

    let api = AfreecaApi::new(Arc::new(http));
    // the chat handshake gets the same deadline as the HTTP calls
    let bridge = ChatSessionBridge::new(Arc::new(AfreecaChatConnector), Arc::new(notifier))
        .with_connect_timeout(config.http_timeout);
    let poller_config = PollerConfig {
        broadcaster_id: config.broadcaster_id.clone(),
        poll_interval: config.poll_interval,
    };
    let poller = LivePoller::new(poller_config, Arc::new(api), bridge);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let _ctrlc_handle = tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl‑C: {:?}", e);
            return;
        }
        info!("Ctrl‑C detected; shutting down...");
        let _ = shutdown_tx.send(true);
    });

    poller.run(shutdown_rx).await;
    Ok(())
}
