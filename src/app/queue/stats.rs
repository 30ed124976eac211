//! Statistics collection for the bounded task queue
//!
//! Counters are lock-free atomics updated from inside running tasks, so
//! reading a snapshot never contends with admission.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Live counters shared between the queue and its running tasks
#[derive(Debug, Default)]
pub(crate) struct QueueCounters {
    submitted: AtomicU64,
    admitted: AtomicU64,
    abandoned: AtomicU64,
    active: AtomicUsize,
    peak_active: AtomicUsize,
    completed: AtomicU64,
    panicked: AtomicU64,
    timed_out: AtomicU64,
    cancelled: AtomicU64,
}

impl QueueCounters {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an admission and return the number of tasks now executing
    pub(crate) fn record_admitted(&self) -> usize {
        self.admitted.fetch_add(1, Ordering::Relaxed);
        let active = self.active.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_active.fetch_max(active, Ordering::AcqRel);
        active
    }

    pub(crate) fn record_abandoned(&self) {
        self.abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_released(&self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }

    pub(crate) fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_panicked(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timed_out(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, capacity: usize, available_slots: usize) -> QueueStats {
        QueueStats {
            capacity,
            available_slots,
            submitted: self.submitted.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Acquire),
            peak_active: self.peak_active.load(Ordering::Acquire),
            completed: self.completed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of queue activity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Configured maximum concurrency
    pub capacity: usize,
    /// Admission slots currently free
    pub available_slots: usize,
    /// Tasks handed to `submit`
    pub submitted: u64,
    /// Tasks that obtained a slot
    pub admitted: u64,
    /// Submitters that stopped waiting before admission
    pub abandoned: u64,
    /// Tasks executing right now
    pub active: usize,
    /// Highest number of simultaneously executing tasks observed
    pub peak_active: usize,
    /// Tasks whose work ran to completion
    pub completed: u64,
    /// Tasks whose work panicked
    pub panicked: u64,
    /// Tasks stopped by the task timeout
    pub timed_out: u64,
    /// Tasks aborted before finishing
    pub cancelled: u64,
}

impl QueueStats {
    /// Tasks submitted but still waiting for a slot
    pub fn waiting(&self) -> u64 {
        self.submitted
            .saturating_sub(self.admitted)
            .saturating_sub(self.abandoned)
    }

    /// Tasks that ended without producing a value
    pub fn failed(&self) -> u64 {
        self.panicked + self.timed_out + self.cancelled
    }

    /// Percentage of finished tasks that completed normally
    pub fn success_rate(&self) -> f64 {
        let finished = self.completed + self.failed();
        if finished == 0 {
            return 100.0;
        }
        (self.completed as f64 / finished as f64) * 100.0
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        format!(
            "{}/{} slots busy (peak {}), {} waiting, {} completed, {} failed ({:.1}% success)",
            self.active,
            self.capacity,
            self.peak_active,
            self.waiting(),
            self.completed,
            self.failed(),
            self.success_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_tracking() {
        let counters = QueueCounters::default();
        counters.record_submitted();
        counters.record_submitted();
        counters.record_submitted();
        assert_eq!(counters.record_admitted(), 1);
        assert_eq!(counters.record_admitted(), 2);
        counters.record_released();
        assert_eq!(counters.record_admitted(), 2);

        let stats = counters.snapshot(4, 2);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.peak_active, 2);
        assert_eq!(stats.waiting(), 0);
    }

    #[test]
    fn test_success_rate() {
        let stats = QueueStats {
            completed: 3,
            panicked: 1,
            ..Default::default()
        };
        assert_eq!(stats.failed(), 1);
        assert!((stats.success_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(QueueStats::default().success_rate(), 100.0);
    }

    #[test]
    fn test_summary_mentions_capacity() {
        let stats = QueueStats {
            capacity: 5,
            active: 2,
            ..Default::default()
        };
        assert!(stats.summary().starts_with("2/5 slots busy"));
    }
}
