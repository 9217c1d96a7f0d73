// Worker - tick-driven polling loop

use super::config::FaultPolicy;
use super::panic_guard::{execute_guarded, panic_message, PanicGuardResult};
use super::shutdown::ShutdownToken;
use super::stats::ProcessorCounters;
use crate::domain::Queue;
use crate::port::ItemProcessor;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Why a polling loop ended
#[derive(Debug)]
pub(crate) enum WorkerExit {
    /// External cancellation token fired
    Cancelled,
    /// Processor stop signal fired
    Stopped,
    /// Processing callback panicked
    Faulted(String),
}

/// One worker of a processor
pub(crate) struct Worker<T> {
    pub(crate) processor_id: usize,
    pub(crate) worker_id: usize,
    pub(crate) tick_interval: Duration,
    pub(crate) queue: Arc<Queue<T>>,
    pub(crate) item_processor: Arc<dyn ItemProcessor<T>>,
    pub(crate) counters: Arc<ProcessorCounters>,
    pub(crate) cancel: CancellationToken,
    pub(crate) shutdown: ShutdownToken,
}

impl<T: Send + 'static> Worker<T> {
    /// Run until cancelled, stopped, or (under `Terminate`) faulted
    pub(crate) async fn run(mut self, fault_policy: FaultPolicy) {
        debug!(
            processor_id = self.processor_id,
            worker_id = self.worker_id,
            "Worker started"
        );

        let mut incarnation: u32 = 1;
        loop {
            match self.poll_loop().await {
                WorkerExit::Cancelled => {
                    info!(
                        processor_id = self.processor_id,
                        worker_id = self.worker_id,
                        "Worker exiting: cancelled"
                    );
                    break;
                }
                WorkerExit::Stopped => {
                    info!(
                        processor_id = self.processor_id,
                        worker_id = self.worker_id,
                        "Worker exiting: processor stopped"
                    );
                    break;
                }
                WorkerExit::Faulted(panic_msg) => match fault_policy {
                    FaultPolicy::Terminate => {
                        error!(
                            processor_id = self.processor_id,
                            worker_id = self.worker_id,
                            panic_msg = %panic_msg,
                            "Worker terminated after fault; pool capacity reduced"
                        );
                        break;
                    }
                    FaultPolicy::Respawn => {
                        incarnation += 1;
                        warn!(
                            processor_id = self.processor_id,
                            worker_id = self.worker_id,
                            incarnation,
                            panic_msg = %panic_msg,
                            "Respawning worker after fault"
                        );
                    }
                },
            }
        }
    }

    /// One incarnation of the waiting-for-tick / draining state machine
    async fn poll_loop(&mut self) -> WorkerExit {
        // First attempt happens one full interval after start
        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return WorkerExit::Cancelled,
                _ = self.shutdown.wait() => return WorkerExit::Stopped,
                _ = ticker.tick() => {}
            }

            let Some(item) = self.queue.dequeue() else {
                continue;
            };

            if let Err(panic_msg) = self.process(item).await {
                return WorkerExit::Faulted(panic_msg);
            }
        }
    }

    /// Run the callback for one item on the blocking pool
    ///
    /// Returns `Err(panic message)` only when the callback panicked.
    async fn process(&self, item: T) -> std::result::Result<(), String> {
        info!(
            processor_id = self.processor_id,
            worker_id = self.worker_id,
            queue_size = self.queue.size(),
            "Processing item"
        );

        let item_processor = Arc::clone(&self.item_processor);
        let handle = tokio::task::spawn_blocking(move || {
            execute_guarded(AssertUnwindSafe(move || item_processor.process(item)))
        });

        // Cancellation is not observed while the callback is in flight
        match handle.await {
            Ok(PanicGuardResult::Success(Ok(()))) => {
                self.counters.record_processed();
                info!(
                    processor_id = self.processor_id,
                    worker_id = self.worker_id,
                    "Completed processing item"
                );
                Ok(())
            }
            Ok(PanicGuardResult::Success(Err(e))) => {
                self.counters.record_failed();
                error!(
                    processor_id = self.processor_id,
                    worker_id = self.worker_id,
                    error = %e,
                    "Error processing item; item dropped"
                );
                Ok(())
            }
            Ok(PanicGuardResult::Panicked(panic_msg)) => {
                self.counters.record_faulted();
                error!(
                    processor_id = self.processor_id,
                    worker_id = self.worker_id,
                    panic_msg = %panic_msg,
                    "Recovered from panic in processing callback"
                );
                Err(panic_msg)
            }
            Err(join_err) => {
                self.counters.record_faulted();
                let panic_msg = if join_err.is_panic() {
                    panic_message(join_err.into_panic().as_ref())
                } else {
                    "processing task cancelled by runtime".to_string()
                };
                error!(
                    processor_id = self.processor_id,
                    worker_id = self.worker_id,
                    panic_msg = %panic_msg,
                    "Processing task did not complete"
                );
                Err(panic_msg)
            }
        }
    }
}
