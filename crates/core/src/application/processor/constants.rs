// Processor constants (no magic values)
use std::time::Duration;

/// Interval at which each worker attempts one dequeue (1s)
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Longest accepted tick interval (one year); the first tick is scheduled
/// at `now + tick_interval`, which must stay representable
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Worker count used by `ProcessorConfig::default()`
pub const DEFAULT_WORKER_COUNT: usize = 1;

/// First worker id; workers are numbered 1..=N
pub const FIRST_WORKER_ID: usize = 1;
