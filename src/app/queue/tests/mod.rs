//! Concurrency tests for the bounded task queue
//!
//! These tests drive the queue under concurrent load and check the admission
//! bound and the slot release guarantee on every completion path.

#[cfg(test)]
mod admission_tests {
    use super::super::*;
    use crate::errors::QueueError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{Notify, Semaphore};
    use tokio::time::sleep;

    /// Tracks how many tasks are inside their work at once
    #[derive(Default)]
    struct Occupancy {
        current: AtomicUsize,
        max: AtomicUsize,
        finished: AtomicUsize,
    }

    impl Occupancy {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max.fetch_max(now, Ordering::SeqCst);
        }

        fn leave(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_admission_bound_under_load() {
        let capacity = 4;
        let task_count = 20;
        let queue = BoundedTaskQueue::new(capacity).unwrap();
        let occupancy = Arc::new(Occupancy::default());

        let mut submitters = Vec::new();
        for _ in 0..task_count {
            let queue = queue.clone();
            let occupancy = Arc::clone(&occupancy);
            submitters.push(tokio::spawn(async move {
                queue
                    .run(async move {
                        occupancy.enter();
                        sleep(Duration::from_millis(20)).await;
                        occupancy.leave();
                    })
                    .await
            }));
        }

        for submitter in submitters {
            submitter.await.unwrap().unwrap();
        }

        assert_eq!(occupancy.finished.load(Ordering::SeqCst), task_count);
        assert_eq!(occupancy.max.load(Ordering::SeqCst), capacity);

        let stats = queue.stats();
        assert_eq!(stats.peak_active, capacity);
        assert_eq!(stats.completed, task_count as u64);
        assert_eq!(stats.active, 0);
        assert_eq!(queue.available_slots(), capacity);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_admission_bound_multi_thread() {
        let capacity = 3;
        let queue = BoundedTaskQueue::new(capacity).unwrap();
        let occupancy = Arc::new(Occupancy::default());

        let runs = (0..30).map(|_| {
            let occupancy = Arc::clone(&occupancy);
            queue.run(async move {
                occupancy.enter();
                sleep(Duration::from_millis(5)).await;
                occupancy.leave();
            })
        });

        for result in futures::future::join_all(runs).await {
            result.unwrap();
        }

        assert!(occupancy.max.load(Ordering::SeqCst) <= capacity);
        assert_eq!(occupancy.finished.load(Ordering::SeqCst), 30);
    }

    #[tokio::test]
    async fn test_slot_release_with_panicking_tasks() {
        let capacity = 5;
        let queue = BoundedTaskQueue::new(capacity).unwrap();

        let runs = (0..1000_usize).map(|i| {
            queue.run(async move {
                if i % 3 == 0 {
                    panic!("task {} failed", i);
                }
                i
            })
        });
        let results = futures::future::join_all(runs).await;

        let panicked = results
            .iter()
            .filter(|r| matches!(r, Err(QueueError::TaskPanicked { .. })))
            .count();
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(panicked, 334);
        assert_eq!(succeeded, 666);
        assert_eq!(queue.available_slots(), capacity);

        // A further `capacity` tasks must be admitted without waiting
        let gate = Arc::new(Semaphore::new(0));
        let mut handles = Vec::new();
        for _ in 0..capacity {
            let gate = Arc::clone(&gate);
            let handle = tokio::time::timeout(
                Duration::from_millis(100),
                queue.submit(async move {
                    let _ = gate.acquire().await;
                }),
            )
            .await
            .expect("slot should be free immediately")
            .unwrap();
            handles.push(handle);
        }
        assert_eq!(queue.available_slots(), 0);

        gate.add_permits(capacity);
        for handle in handles {
            handle.join().await.unwrap();
        }
        assert_eq!(queue.available_slots(), capacity);

        let stats = queue.stats();
        assert_eq!(stats.panicked, 334);
        assert_eq!(stats.completed, 666 + capacity as u64);
    }

    #[tokio::test]
    async fn test_panic_message_reaches_caller() {
        let queue = BoundedTaskQueue::new(1).unwrap();
        let result: Result<(), _> = queue.run(async { panic!("decoder exploded") }).await;

        match result {
            Err(QueueError::TaskPanicked { message }) => {
                assert_eq!(message, "decoder exploded");
            }
            other => panic!("Expected TaskPanicked, got {:?}", other),
        }
        assert_eq!(queue.available_slots(), 1);
    }

    #[tokio::test]
    async fn test_timeout_releases_slot() {
        let config = TaskQueueConfig::new(1).with_task_timeout(Duration::from_millis(20));
        let queue = BoundedTaskQueue::with_config(config).unwrap();

        let result = queue
            .run(async {
                sleep(Duration::from_secs(30)).await;
            })
            .await;

        assert!(matches!(result, Err(QueueError::TaskTimeout { millis: 20 })));
        assert_eq!(queue.available_slots(), 1);
        assert_eq!(queue.stats().timed_out, 1);

        // The freed slot is usable straight away
        assert_eq!(queue.run(async { "next" }).await.unwrap(), "next");
    }

    #[tokio::test]
    async fn test_abort_releases_slot() {
        let queue = BoundedTaskQueue::new(1).unwrap();

        let handle = queue
            .submit(async {
                sleep(Duration::from_secs(30)).await;
            })
            .await
            .unwrap();
        assert_eq!(queue.available_slots(), 0);

        handle.abort();
        let result = handle.join().await;
        assert!(matches!(result, Err(QueueError::TaskCancelled)));
        assert_eq!(queue.available_slots(), 1);

        let stats = queue.stats();
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.active, 0);
    }

    #[tokio::test]
    async fn test_waiting_submitter_is_admitted_when_slot_frees() {
        let queue = BoundedTaskQueue::new(1).unwrap();
        let gate = Arc::new(Notify::new());

        let blocker = {
            let gate = Arc::clone(&gate);
            queue.submit(async move { gate.notified().await }).await.unwrap()
        };

        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.run(async { "admitted" }).await })
        };

        sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        assert_eq!(queue.stats().waiting(), 1);

        gate.notify_one();
        blocker.join().await.unwrap();
        assert_eq!(waiter.await.unwrap().unwrap(), "admitted");
    }

    #[tokio::test]
    async fn test_dropped_submitter_takes_no_slot() {
        let queue = BoundedTaskQueue::new(1).unwrap();
        let gate = Arc::new(Notify::new());

        let blocker = {
            let gate = Arc::clone(&gate);
            queue.submit(async move { gate.notified().await }).await.unwrap()
        };

        // Give up waiting for admission
        let abandoned =
            tokio::time::timeout(Duration::from_millis(10), queue.submit(async { 1 })).await;
        assert!(abandoned.is_err());

        gate.notify_one();
        blocker.join().await.unwrap();
        assert_eq!(queue.available_slots(), 1);
        let stats = queue.stats();
        assert_eq!(stats.admitted, 1);
        assert_eq!(stats.abandoned, 1);
        assert_eq!(stats.waiting(), 0);
    }
}
