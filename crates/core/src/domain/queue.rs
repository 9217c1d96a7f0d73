// Queue Domain Model - concurrent FIFO container

use crate::domain::error::{DomainError, Result};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe FIFO queue
///
/// A single exclusive lock guards the internal sequence and is held only for
/// the duration of one operation. Items come out in strict insertion order.
#[derive(Debug)]
pub struct Queue<T> {
    items: Mutex<VecDeque<T>>,
    capacity: Option<usize>,
}

impl<T> Queue<T> {
    /// Create an unbounded queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            capacity: None,
        }
    }

    /// Create a queue that rejects items once `capacity` are held
    pub fn bounded(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: Some(capacity),
        }
    }

    /// Capacity bound, if any
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append `item` at the tail
    ///
    /// Returns the queue length right after insertion, observed under the
    /// same lock acquisition. Only a bounded queue can fail.
    pub fn enqueue(&self, item: T) -> Result<usize> {
        let mut items = self.lock();
        if let Some(capacity) = self.capacity {
            if items.len() >= capacity {
                return Err(DomainError::QueueFull { capacity });
            }
        }
        items.push_back(item);
        Ok(items.len())
    }

    /// Remove and return the head item
    pub fn dequeue(&self) -> Option<T> {
        self.lock().pop_front()
    }

    pub fn size(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // No user code ever runs under this lock, so a poisoned guard still
    // holds a consistent sequence.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Queue<T> {
    /// Return a copy of the head item without removing it
    pub fn peek(&self) -> Option<T> {
        self.lock().front().cloned()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}
