// Processor - owns one queue and a fixed pool of polling workers

pub mod config;
pub mod constants;
mod panic_guard;
mod shutdown;
mod stats;
mod worker;

pub use config::{FaultPolicy, ProcessorConfig};
pub use stats::{LifecycleState, ProcessorStats};

use crate::domain::Queue;
use crate::error::{AppError, Result};
use crate::port::{ItemProcessor, ProcessError};
use constants::FIRST_WORKER_ID;
use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
use stats::ProcessorCounters;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};
use worker::Worker;

/// Worker-pool processor
///
/// Created idle with an empty queue. `start` spawns `worker_count` workers
/// that each attempt one dequeue per tick; `stop` signals them and waits
/// until every one has exited. A stopped processor cannot be restarted.
///
/// Dropping a running processor also releases its workers, since the stop
/// signal resolves once its sender is gone.
///
/// # Example
/// ```text
/// let processor = Processor::new(1, 3, |msg: Message| {
///     println!("{}", msg.content);
///     Ok(())
/// })?;
/// processor.start(CancellationToken::new())?;
/// let position = processor.enqueue(Message::greeting(0))?;
/// processor.stop().await;
/// ```
pub struct Processor<T> {
    id: usize,
    config: ProcessorConfig,
    queue: Arc<Queue<T>>,
    item_processor: Arc<dyn ItemProcessor<T>>,
    counters: Arc<ProcessorCounters>,
    shutdown_tx: ShutdownSender,
    shutdown_rx: ShutdownToken,
    tracker: TaskTracker,
    state: Mutex<LifecycleState>,
}

impl<T: Send + 'static> Processor<T> {
    /// Create an idle processor with default tick and an unbounded queue
    pub fn new<F>(id: usize, worker_count: usize, process_fn: F) -> Result<Self>
    where
        F: Fn(T) -> std::result::Result<(), ProcessError> + Send + Sync + 'static,
    {
        Self::with_config(id, ProcessorConfig::new(worker_count), process_fn)
    }

    /// Create an idle processor from an explicit configuration
    pub fn with_config<F>(id: usize, config: ProcessorConfig, process_fn: F) -> Result<Self>
    where
        F: Fn(T) -> std::result::Result<(), ProcessError> + Send + Sync + 'static,
    {
        Self::with_processor(id, config, Arc::new(process_fn))
    }

    /// Create an idle processor around any `ItemProcessor` implementation
    pub fn with_processor(
        id: usize,
        config: ProcessorConfig,
        item_processor: Arc<dyn ItemProcessor<T>>,
    ) -> Result<Self> {
        config.validate()?;

        let queue = match config.queue_capacity {
            Some(capacity) => Queue::bounded(capacity),
            None => Queue::new(),
        };
        let (shutdown_tx, shutdown_rx) = shutdown_channel();

        Ok(Self {
            id,
            config,
            queue: Arc::new(queue),
            item_processor,
            counters: Arc::new(ProcessorCounters::default()),
            shutdown_tx,
            shutdown_rx,
            tracker: TaskTracker::new(),
            state: Mutex::new(LifecycleState::Idle),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn worker_count(&self) -> usize {
        self.config.worker_count
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        *self.lock_state()
    }

    /// Number of worker tasks that have not exited yet
    pub fn live_workers(&self) -> usize {
        self.tracker.len()
    }

    /// Add an item to the queue
    ///
    /// Returns the queue size right after insertion. Fails only when a
    /// capacity bound is configured and reached.
    pub fn enqueue(&self, item: T) -> Result<usize> {
        let size = self.queue.enqueue(item)?;
        self.counters.record_enqueued();
        debug!(processor_id = self.id, queue_size = size, "Item enqueued");
        Ok(size)
    }

    /// Current queue size
    pub fn queue_size(&self) -> usize {
        self.queue.size()
    }

    /// Spawn the workers and return immediately
    ///
    /// Workers run until `cancel` fires or `stop` is called. Must be called
    /// from within a tokio runtime.
    pub fn start(&self, cancel: CancellationToken) -> Result<()> {
        let mut state = self.lock_state();
        match *state {
            LifecycleState::Idle => {}
            LifecycleState::Running => {
                return Err(AppError::InvalidState(format!(
                    "processor {} is already running",
                    self.id
                )))
            }
            LifecycleState::Stopped => {
                return Err(AppError::InvalidState(format!(
                    "processor {} has been stopped and cannot be restarted",
                    self.id
                )))
            }
        }

        if tokio::runtime::Handle::try_current().is_err() {
            return Err(AppError::InvalidState(format!(
                "processor {} must be started inside a tokio runtime",
                self.id
            )));
        }

        let first = FIRST_WORKER_ID;
        for worker_id in first..first + self.config.worker_count {
            let worker = Worker {
                processor_id: self.id,
                worker_id,
                tick_interval: self.config.tick_interval,
                queue: Arc::clone(&self.queue),
                item_processor: Arc::clone(&self.item_processor),
                counters: Arc::clone(&self.counters),
                cancel: cancel.clone(),
                shutdown: self.shutdown_rx.clone(),
            };
            self.tracker.spawn(worker.run(self.config.fault_policy));
        }
        *state = LifecycleState::Running;

        info!(
            processor_id = self.id,
            worker_count = self.config.worker_count,
            tick_ms = self.config.tick_interval.as_millis() as u64,
            fault_policy = %self.config.fault_policy,
            "Processor started"
        );
        Ok(())
    }

    /// Signal every worker to exit and wait until all have
    ///
    /// Idempotent: later or concurrent calls also return only once every
    /// worker is gone. Items still queued are left in place.
    pub async fn stop(&self) {
        let previous = {
            let mut state = self.lock_state();
            std::mem::replace(&mut *state, LifecycleState::Stopped)
        };

        if previous == LifecycleState::Running {
            info!(processor_id = self.id, "Stopping processor");
        }

        self.shutdown_tx.shutdown();
        self.tracker.close();
        self.tracker.wait().await;

        if previous != LifecycleState::Stopped {
            info!(
                processor_id = self.id,
                remaining = self.queue.size(),
                "Processor stopped"
            );
        }
    }

    pub fn stats(&self) -> ProcessorStats {
        ProcessorStats::collect(
            self.id,
            self.state(),
            self.config.worker_count,
            self.tracker.len(),
            self.queue.size(),
            &self.counters,
        )
    }

    fn lock_state(&self) -> MutexGuard<'_, LifecycleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
