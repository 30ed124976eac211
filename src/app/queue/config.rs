//! Configuration for the bounded task queue
//!
//! The queue's capacity is fixed for its lifetime, so configuration is
//! validated once at construction and never changes afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::queue;
use crate::errors::{QueueError, QueueResult};

/// Runtime configuration for [`BoundedTaskQueue`](super::BoundedTaskQueue)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQueueConfig {
    /// Maximum number of concurrently executing tasks
    pub max_concurrent: usize,
    /// Upper bound on a single task's execution time (None = unbounded)
    #[serde(with = "humantime_serde")]
    pub task_timeout: Option<Duration>,
}

impl Default for TaskQueueConfig {
    fn default() -> Self {
        Self {
            max_concurrent: queue::DEFAULT_MAX_CONCURRENT,
            task_timeout: Some(queue::DEFAULT_TASK_TIMEOUT),
        }
    }
}

impl TaskQueueConfig {
    /// Create a configuration with the given capacity and no task timeout
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent,
            task_timeout: None,
        }
    }

    /// Set the per-task timeout
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    /// Remove the per-task timeout
    pub fn without_task_timeout(mut self) -> Self {
        self.task_timeout = None;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `QueueError::InvalidCapacity` when `max_concurrent` is zero
    pub fn validate(&self) -> QueueResult<()> {
        if self.max_concurrent == 0 {
            return Err(QueueError::InvalidCapacity {
                capacity: self.max_concurrent,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TaskQueueConfig::default();
        assert_eq!(config.max_concurrent, 5);
        assert_eq!(config.task_timeout, Some(Duration::from_secs(60)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = TaskQueueConfig::new(0).validate();
        assert!(matches!(
            result,
            Err(QueueError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_config_builder() {
        let config = TaskQueueConfig::new(3).with_task_timeout(Duration::from_millis(250));
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.task_timeout, Some(Duration::from_millis(250)));

        let config = config.without_task_timeout();
        assert_eq!(config.task_timeout, None);
    }
}
