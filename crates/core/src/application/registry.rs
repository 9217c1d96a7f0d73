// Processor Registry - explicit lookup table owned by process wiring

use crate::application::processor::{Processor, ProcessorStats};
use crate::error::{AppError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Processors indexed by id
///
/// Built once during wiring and then shared (usually behind an `Arc`) with
/// whoever needs lookup, such as the request layer.
pub struct ProcessorRegistry<T> {
    processors: BTreeMap<usize, Arc<Processor<T>>>,
}

impl<T: Send + 'static> ProcessorRegistry<T> {
    pub fn new() -> Self {
        Self {
            processors: BTreeMap::new(),
        }
    }

    /// Add a processor under its own id
    pub fn register(&mut self, processor: Processor<T>) -> Result<Arc<Processor<T>>> {
        let id = processor.id();
        if self.processors.contains_key(&id) {
            return Err(AppError::Conflict(format!(
                "processor {} is already registered",
                id
            )));
        }
        let processor = Arc::new(processor);
        self.processors.insert(id, Arc::clone(&processor));
        Ok(processor)
    }

    pub fn get(&self, id: usize) -> Result<&Arc<Processor<T>>> {
        self.processors
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("invalid processor ID: {}", id)))
    }

    /// Enqueue onto processor `id`, returning its new queue size
    pub fn enqueue(&self, id: usize, item: T) -> Result<usize> {
        self.get(id)?.enqueue(item)
    }

    pub fn queue_size(&self, id: usize) -> Result<usize> {
        Ok(self.get(id)?.queue_size())
    }

    pub fn ids(&self) -> Vec<usize> {
        self.processors.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn stats(&self) -> Vec<ProcessorStats> {
        self.processors.values().map(|p| p.stats()).collect()
    }

    /// Start every processor with a shared cancellation token
    ///
    /// If one fails to start, the ones already started are stopped again
    /// before the error is returned.
    pub async fn start_all(&self, cancel: &CancellationToken) -> Result<()> {
        let mut started: Vec<&Arc<Processor<T>>> = Vec::with_capacity(self.processors.len());
        for processor in self.processors.values() {
            if let Err(e) = processor.start(cancel.clone()) {
                warn!(
                    processor_id = processor.id(),
                    error = %e,
                    rolled_back = started.len(),
                    "Processor failed to start; stopping the ones already started"
                );
                for processor in started {
                    processor.stop().await;
                }
                return Err(e);
            }
            started.push(processor);
        }
        info!(processors = self.processors.len(), "All processors started");
        Ok(())
    }

    /// Stop every processor, waiting for all of their workers
    pub async fn stop_all(&self) {
        for processor in self.processors.values() {
            processor.stop().await;
        }
        info!(processors = self.processors.len(), "All processors stopped");
    }
}

impl<T: Send + 'static> Default for ProcessorRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
