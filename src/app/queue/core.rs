//! Core bounded task queue implementation
//!
//! Admission control is a counting semaphore sized to the queue capacity.
//! A submitted task first waits for a permit, then runs on the tokio runtime
//! while owning that permit. The permit lives inside a [`SlotGuard`] whose
//! `Drop` is the only place a slot is given back, so success, panic, timeout
//! and abort all release exactly once.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::{QueueError, QueueResult};

use super::config::TaskQueueConfig;
use super::stats::{QueueCounters, QueueStats};

/// Concurrency-limiting executor
///
/// Cloning is cheap and every clone shares the same admission slots.
#[derive(Debug, Clone)]
pub struct BoundedTaskQueue {
    config: TaskQueueConfig,
    semaphore: Arc<Semaphore>,
    counters: Arc<QueueCounters>,
}

impl BoundedTaskQueue {
    /// Create a queue admitting at most `max_concurrent` tasks at once
    ///
    /// # Errors
    ///
    /// Returns `QueueError::InvalidCapacity` if `max_concurrent` is zero
    pub fn new(max_concurrent: usize) -> QueueResult<Self> {
        Self::with_config(TaskQueueConfig::new(max_concurrent))
    }

    /// Create a queue from a full configuration
    ///
    /// # Errors
    ///
    /// Returns `QueueError::InvalidCapacity` if the configured capacity is zero
    pub fn with_config(config: TaskQueueConfig) -> QueueResult<Self> {
        config.validate()?;

        debug!(
            "Created bounded task queue: capacity={}, task_timeout={:?}",
            config.max_concurrent, config.task_timeout
        );

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            counters: Arc::new(QueueCounters::default()),
            config,
        })
    }

    /// Maximum number of concurrently executing tasks
    pub fn capacity(&self) -> usize {
        self.config.max_concurrent
    }

    /// Number of admission slots currently free
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Queue configuration
    pub fn config(&self) -> &TaskQueueConfig {
        &self.config
    }

    /// Snapshot of queue statistics
    pub fn stats(&self) -> QueueStats {
        self.counters.snapshot(self.capacity(), self.available_slots())
    }

    /// Submit work to the queue
    ///
    /// Suspends the caller until an admission slot is free, then spawns the
    /// work and returns immediately with a handle to its outcome. Dropping
    /// this future while it waits for admission takes no slot and is counted
    /// as abandoned.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Closed` if the admission semaphore was closed
    pub async fn submit<F, T>(&self, work: F) -> QueueResult<TaskHandle<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.counters.record_submitted();
        let waiter = WaitGuard {
            counters: Arc::clone(&self.counters),
            admitted: false,
        };

        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| QueueError::Closed)?;
        waiter.admit();

        let active = self.counters.record_admitted();
        debug!("Task admitted ({}/{} slots busy)", active, self.capacity());

        let slot = SlotGuard {
            _permit: permit,
            counters: Arc::clone(&self.counters),
            finished: false,
        };
        let timeout = self.config.task_timeout;

        let inner = tokio::spawn(async move {
            let mut slot = slot;
            let outcome = execute(work, timeout).await;
            slot.finish(&outcome);
            drop(slot);
            outcome
        });

        Ok(TaskHandle { inner })
    }

    /// Submit work and wait for its outcome
    ///
    /// # Errors
    ///
    /// Returns the task's `QueueError` if it panicked, timed out or was
    /// cancelled
    pub async fn run<F, T>(&self, work: F) -> QueueResult<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.submit(work).await?.join().await
    }
}

/// Handle to a submitted task's outcome
#[derive(Debug)]
pub struct TaskHandle<T> {
    inner: JoinHandle<QueueResult<T>>,
}

impl<T> TaskHandle<T> {
    /// Wait for the task to finish
    ///
    /// # Errors
    ///
    /// Returns `QueueError::TaskPanicked`, `QueueError::TaskTimeout` or
    /// `QueueError::TaskCancelled` when the work did not produce a value
    pub async fn join(self) -> QueueResult<T> {
        match self.inner.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => Err(QueueError::TaskCancelled),
            Err(e) => Err(QueueError::TaskPanicked {
                message: e.to_string(),
            }),
        }
    }

    /// Cancel the task; its slot is released when the runtime drops it
    pub fn abort(&self) {
        self.inner.abort();
    }

    /// Whether the task has finished running
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

/// Marks a submitter as abandoned if it stops waiting before admission
struct WaitGuard {
    counters: Arc<QueueCounters>,
    admitted: bool,
}

impl WaitGuard {
    fn admit(mut self) {
        self.admitted = true;
    }
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        if !self.admitted {
            self.counters.record_abandoned();
        }
    }
}

/// Owns one admission slot for the lifetime of a running task
struct SlotGuard {
    _permit: OwnedSemaphorePermit,
    counters: Arc<QueueCounters>,
    finished: bool,
}

impl SlotGuard {
    fn finish<T>(&mut self, outcome: &QueueResult<T>) {
        self.finished = true;
        match outcome {
            Ok(_) => self.counters.record_completed(),
            Err(QueueError::TaskTimeout { .. }) => self.counters.record_timed_out(),
            Err(_) => self.counters.record_panicked(),
        }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.counters.record_cancelled();
        }
        self.counters.record_released();
    }
}

/// Run work with panic isolation and an optional time limit
async fn execute<F, T>(work: F, timeout: Option<Duration>) -> QueueResult<T>
where
    F: Future<Output = T>,
{
    let guarded = AssertUnwindSafe(work).catch_unwind();

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Task exceeded timeout of {}ms", limit.as_millis());
                return Err(QueueError::TaskTimeout {
                    millis: limit.as_millis() as u64,
                });
            }
        },
        None => guarded.await,
    };

    result.map_err(|payload| {
        let message = panic_message(payload.as_ref());
        warn!("Task panicked: {}", message);
        QueueError::TaskPanicked { message }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
