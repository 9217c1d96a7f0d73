// Submission Use Case - builds messages and routes them to a processor

use crate::application::processor::ProcessorStats;
use crate::application::registry::ProcessorRegistry;
use crate::domain::Message;
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

/// Submission service used by the request layer
pub struct SubmissionService {
    registry: Arc<ProcessorRegistry<Message>>,
}

impl SubmissionService {
    pub fn new(registry: Arc<ProcessorRegistry<Message>>) -> Self {
        Self { registry }
    }

    /// Enqueue a greeting on processor `processor_id`
    ///
    /// The message records the queue size seen just before submission; the
    /// returned size is the one observed by the enqueue itself.
    pub fn enqueue(&self, processor_id: usize) -> Result<(usize, Message)> {
        let processor = self.registry.get(processor_id)?;
        let msg = Message::greeting(processor.queue_size());
        let queue_size = processor.enqueue(msg.clone())?;

        info!(
            processor_id,
            queue_size,
            count = msg.count,
            "Message submitted"
        );
        Ok((queue_size, msg))
    }

    pub fn queue_size(&self, processor_id: usize) -> Result<usize> {
        self.registry.queue_size(processor_id)
    }

    pub fn stats(&self) -> Vec<ProcessorStats> {
        self.registry.stats()
    }
}
