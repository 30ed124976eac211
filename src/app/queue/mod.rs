//! Bounded task queue for network operations
//!
//! This module provides [`BoundedTaskQueue`], an executor that admits at most
//! N tasks at a time and queues the rest without bound.
//!
//! # Features
//!
//! - **Admission control**: a counting semaphore caps concurrently executing tasks
//! - **Slot release guarantee**: a slot is returned exactly once per admitted
//!   task, whether the work completes, panics, times out or is aborted
//! - **Panic isolation**: a panicking task reports `QueueError::TaskPanicked`
//!   through its own handle and never takes the queue down
//! - **Statistics**: lock-free counters including peak concurrency
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use topic_fetcher::app::queue::BoundedTaskQueue;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = BoundedTaskQueue::new(5)?;
//!
//! // Waits for a free slot, then runs the work on the runtime
//! let handle = queue.submit(async { 1 + 1 }).await?;
//! assert_eq!(handle.join().await?, 2);
//!
//! println!("{}", queue.stats().summary());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod stats;

#[cfg(test)]
mod tests;

// Re-export main types for public API
pub use config::TaskQueueConfig;
pub use core::{BoundedTaskQueue, TaskHandle};
pub use stats::QueueStats;
