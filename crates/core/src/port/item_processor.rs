// Item Processor Port
// The caller-supplied work performed on every dequeued item

use thiserror::Error;

/// Error reported by a processing callback
///
/// A reported error is logged and the item is dropped. It never stops the
/// worker; only a panic does.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ProcessError {
    pub fn failed(msg: impl Into<String>) -> Self {
        ProcessError::Failed(msg.into())
    }
}

impl From<String> for ProcessError {
    fn from(msg: String) -> Self {
        ProcessError::Failed(msg)
    }
}

impl From<&str> for ProcessError {
    fn from(msg: &str) -> Self {
        ProcessError::Failed(msg.to_string())
    }
}

/// Item processor trait
///
/// Runs synchronously on the blocking pool and may block for as long as it
/// needs. Any `Fn(T) -> Result<(), ProcessError>` closure implements it.
pub trait ItemProcessor<T>: Send + Sync {
    fn process(&self, item: T) -> Result<(), ProcessError>;
}

impl<T, F> ItemProcessor<T> for F
where
    F: Fn(T) -> Result<(), ProcessError> + Send + Sync,
{
    fn process(&self, item: T) -> Result<(), ProcessError> {
        self(item)
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Mutex, PoisonError};

    /// Records every item it sees, in the order it saw them
    pub struct RecordingProcessor<T> {
        seen: Mutex<Vec<T>>,
    }

    impl<T: Clone> RecordingProcessor<T> {
        pub fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn seen(&self) -> Vec<T> {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl<T: Clone> Default for RecordingProcessor<T> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<T: Clone + Send> ItemProcessor<T> for RecordingProcessor<T> {
        fn process(&self, item: T) -> Result<(), ProcessError> {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(item);
            Ok(())
        }
    }
}
