//! RPC Round-Trip Tests
//!
//! Runs the JSON-RPC server on an ephemeral port and drives it with the SDK.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use workpool_api_rpc::server::RpcServerConfig;
use workpool_api_rpc::{RpcServer, RunningServer};
use workpool_core::application::{Processor, ProcessorConfig, ProcessorRegistry};
use workpool_core::domain::Message;
use workpool_sdk::WorkpoolClient;

/// Two processors that never tick during a test, so queue sizes stay put
fn idle_registry() -> ProcessorRegistry<Message> {
    let mut registry = ProcessorRegistry::new();
    for (id, workers) in [(1, 1), (2, 3)] {
        let config = ProcessorConfig::new(workers).with_tick_interval(Duration::from_secs(3600));
        registry
            .register(Processor::with_config(id, config, |_: Message| Ok(())).unwrap())
            .unwrap();
    }
    registry
}

async fn serve(registry: Arc<ProcessorRegistry<Message>>) -> RunningServer {
    let config = RpcServerConfig {
        port: 0,
        ..Default::default()
    };
    RpcServer::new(config, registry).start().await.unwrap()
}

#[tokio::test]
async fn test_enqueue_and_size_over_rpc() {
    let registry = Arc::new(idle_registry());
    let server = serve(Arc::clone(&registry)).await;
    let client = WorkpoolClient::connect(server.url()).await.unwrap();

    let first = client.enqueue(2).await.unwrap();
    assert_eq!(first.message, "Hello World! 0");
    assert_eq!(first.count, 0);
    assert_eq!(first.queue_size, 1);

    let second = client.enqueue(2).await.unwrap();
    assert_eq!(second.count, 1);
    assert_eq!(second.queue_size, 2);

    assert_eq!(client.queue_size(2).await.unwrap(), 2);
    assert_eq!(client.queue_size(1).await.unwrap(), 0);
    assert_eq!(registry.queue_size(2).unwrap(), 2);

    server.handle.stop().unwrap();
}

#[tokio::test]
async fn test_unknown_processor_is_reported() {
    let server = serve(Arc::new(idle_registry())).await;
    let client = WorkpoolClient::connect(server.url()).await.unwrap();

    let err = client.enqueue(7).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {}", err);
    assert!(err.to_string().contains("invalid processor ID: 7"));

    let err = client.queue_size(0).await.unwrap_err();
    assert!(err.is_not_found());

    server.handle.stop().unwrap();
}

#[tokio::test]
async fn test_stats_reflect_running_processors() {
    let registry = Arc::new(idle_registry());
    let cancel = CancellationToken::new();
    registry.start_all(&cancel).await.unwrap();

    let server = serve(Arc::clone(&registry)).await;
    let client = WorkpoolClient::connect(server.url()).await.unwrap();
    client.enqueue(1).await.unwrap();

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.processors.len(), 2);

    let first = &stats.processors[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.state, "RUNNING");
    assert_eq!(first.live_workers, 1);
    assert_eq!(first.enqueued, 1);
    assert_eq!(first.queue_size, 1);

    let second = &stats.processors[1];
    assert_eq!(second.worker_count, 3);
    assert_eq!(second.live_workers, 3);

    cancel.cancel();
    registry.stop_all().await;
    server.handle.stop().unwrap();
}
