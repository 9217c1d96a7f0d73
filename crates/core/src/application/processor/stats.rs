// Processor lifecycle state and counters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Processor lifecycle: Idle -> Running -> Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Idle => write!(f, "IDLE"),
            LifecycleState::Running => write!(f, "RUNNING"),
            LifecycleState::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// Counters shared between a processor and its workers
#[derive(Debug, Default)]
pub(crate) struct ProcessorCounters {
    enqueued: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    faulted: AtomicU64,
}

impl ProcessorCounters {
    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_faulted(&self) {
        self.faulted.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time view of a processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorStats {
    pub id: usize,
    pub state: LifecycleState,
    pub worker_count: usize,
    pub live_workers: usize,
    pub queue_size: usize,
    pub enqueued: u64,
    /// Callbacks that returned Ok
    pub processed: u64,
    /// Callbacks that returned Err (item dropped)
    pub failed: u64,
    /// Callbacks that panicked
    pub faulted: u64,
}

impl ProcessorStats {
    pub(crate) fn collect(
        id: usize,
        state: LifecycleState,
        worker_count: usize,
        live_workers: usize,
        queue_size: usize,
        counters: &ProcessorCounters,
    ) -> Self {
        Self {
            id,
            state,
            worker_count,
            live_workers,
            queue_size,
            enqueued: counters.enqueued.load(Ordering::Relaxed),
            processed: counters.processed.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
            faulted: counters.faulted.load(Ordering::Relaxed),
        }
    }
}
