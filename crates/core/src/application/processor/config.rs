// Processor Configuration

use super::constants::{DEFAULT_TICK_INTERVAL, DEFAULT_WORKER_COUNT, MAX_TICK_INTERVAL};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// What happens to a worker whose processing callback panics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// The worker exits for good and the pool shrinks by one
    #[default]
    Terminate,
    /// A fresh incarnation with the same worker id resumes polling
    Respawn,
}

impl fmt::Display for FaultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultPolicy::Terminate => write!(f, "terminate"),
            FaultPolicy::Respawn => write!(f, "respawn"),
        }
    }
}

impl FromStr for FaultPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminate" => Ok(FaultPolicy::Terminate),
            "respawn" => Ok(FaultPolicy::Respawn),
            other => Err(AppError::Config(format!(
                "unknown fault policy '{}' (expected terminate|respawn)",
                other
            ))),
        }
    }
}

/// Processor configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub worker_count: usize,
    pub tick_interval: Duration,
    /// `None` keeps the queue unbounded
    pub queue_capacity: Option<usize>,
    pub fault_policy: FaultPolicy,
}

impl ProcessorConfig {
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Default::default()
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn with_fault_policy(mut self, fault_policy: FaultPolicy) -> Self {
        self.fault_policy = fault_policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(AppError::Validation(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.tick_interval.is_zero() {
            return Err(AppError::Validation(
                "tick_interval must be greater than zero".to_string(),
            ));
        }
        if self.tick_interval > MAX_TICK_INTERVAL {
            return Err(AppError::Validation(format!(
                "tick_interval must not exceed {}s",
                MAX_TICK_INTERVAL.as_secs()
            )));
        }
        if self.queue_capacity == Some(0) {
            return Err(AppError::Validation(
                "queue_capacity must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            tick_interval: DEFAULT_TICK_INTERVAL,
            queue_capacity: None,
            fault_policy: FaultPolicy::default(),
        }
    }
}
