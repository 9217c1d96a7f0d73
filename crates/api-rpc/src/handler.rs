//! RPC Method Handlers
//!
//! Implements each JSON-RPC method on top of the submission service.

use crate::error::to_rpc_error;
use crate::types::{
    EnqueueRequest, EnqueueResponse, QueueSizeRequest, QueueSizeResponse, StatsRequest,
    StatsResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::Instant;
use workpool_core::application::{ProcessorRegistry, SubmissionService};
use workpool_core::domain::Message;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    submissions: SubmissionService,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(registry: Arc<ProcessorRegistry<Message>>) -> Self {
        Self {
            submissions: SubmissionService::new(registry),
            start_time: Instant::now(),
        }
    }

    /// queue.enqueue.v1
    pub fn enqueue(&self, params: EnqueueRequest) -> Result<EnqueueResponse, ErrorObjectOwned> {
        let (queue_size, msg) = self
            .submissions
            .enqueue(params.processor)
            .map_err(to_rpc_error)?;

        Ok(EnqueueResponse {
            message: msg.content,
            count: msg.count,
            queue_size,
        })
    }

    /// queue.size.v1
    pub fn queue_size(
        &self,
        params: QueueSizeRequest,
    ) -> Result<QueueSizeResponse, ErrorObjectOwned> {
        let queue_size = self
            .submissions
            .queue_size(params.processor)
            .map_err(to_rpc_error)?;

        Ok(QueueSizeResponse { queue_size })
    }

    /// admin.stats.v1
    pub fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        Ok(StatsResponse {
            processors: self.submissions.stats(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}
