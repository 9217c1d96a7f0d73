//! Workpool Daemon - Main Entry Point
//! Wires processors, the JSON-RPC queue API and signal handling together

mod config;

use anyhow::Result;
use config::{DaemonConfig, LogFormat};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use workpool_api_rpc::{server::RpcServerConfig, RpcServer};
use workpool_core::application::{Processor, ProcessorRegistry};
use workpool_core::domain::Message;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env()?;

    // 2. Initialize logging
    init_logging(config.log_format)?;
    info!("Workpool daemon v{} starting...", VERSION);
    info!(config = ?config, "Configuration loaded");

    // 3. Build processors (ids are 1-based positions in WORKPOOL_WORKERS)
    let mut registry = ProcessorRegistry::new();
    for index in 0..config.workers.len() {
        let processor = Processor::with_config(
            index + 1,
            config.processor_config(index),
            simulate_work(config.processing_time),
        )?;
        registry.register(processor)?;
    }
    let registry = Arc::new(registry);

    // 4. Start workers
    let cancel = CancellationToken::new();
    registry.start_all(&cancel).await?;

    // 5. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let server = RpcServer::new(rpc_config, Arc::clone(&registry))
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(url = %server.url(), "System ready. Waiting for messages...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    shutdown_signal().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown: cancel, then wait for every worker
    cancel.cancel();
    registry.stop_all().await;
    server
        .handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    server.handle.stopped().await;

    info!("Shutdown complete.");
    Ok(())
}

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("workpool=info"))?;

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()?;
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .try_init()?;
        }
    }
    Ok(())
}

/// Processing callback: logs the message and blocks for `processing_time`
fn simulate_work(
    processing_time: Duration,
) -> impl Fn(Message) -> std::result::Result<(), workpool_core::port::ProcessError>
       + Send
       + Sync
       + 'static {
    move |msg: Message| {
        info!(content = %msg.content, count = msg.count, "Handling message");
        std::thread::sleep(processing_time);
        Ok(())
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
