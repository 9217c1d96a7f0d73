//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};
use workpool_core::application::ProcessorStats;

/// queue.enqueue.v1 - Submit a message to a processor
#[derive(Debug, Deserialize)]
pub struct EnqueueRequest {
    pub processor: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnqueueResponse {
    pub message: String,
    pub count: usize,
    pub queue_size: usize,
}

/// queue.size.v1 - Current queue size of a processor
#[derive(Debug, Deserialize)]
pub struct QueueSizeRequest {
    pub processor: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueSizeResponse {
    pub queue_size: usize,
}

/// admin.stats.v1 - Per-processor statistics
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub processors: Vec<ProcessorStats>,
    pub uptime_seconds: u64,
}
