//! SDK Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use serde::Deserialize;

/// Response from queue.enqueue.v1
#[derive(Debug, Clone, Deserialize)]
pub struct EnqueueResponse {
    pub message: String,
    pub count: usize,
    pub queue_size: usize,
}

/// Response from queue.size.v1
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSizeResponse {
    pub queue_size: usize,
}

/// One processor entry of admin.stats.v1
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorStats {
    pub id: usize,
    pub state: String,
    pub worker_count: usize,
    pub live_workers: usize,
    pub queue_size: usize,
    pub enqueued: u64,
    pub processed: u64,
    pub failed: u64,
    pub faulted: u64,
}

/// Response from admin.stats.v1
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub processors: Vec<ProcessorStats>,
    pub uptime_seconds: u64,
}
