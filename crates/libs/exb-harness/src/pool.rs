//! Fixed size pool of worker threads draining a [`WorkQueue`].

use std::{
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

use tracing::{debug, trace};

use crate::queue::WorkQueue;

/// Default number of export workers.
pub const DEFAULT_POOL_SIZE: usize = 20;

/// Marks a dequeued item done even if the operation panics, so that
/// [`WorkQueue::join`] never waits on a dead worker.
struct TaskGuard<'a, T>(&'a WorkQueue<T>);

impl<T> Drop for TaskGuard<'_, T> {
    fn drop(&mut self) {
        self.0.task_done();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    size: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}

impl WorkerPool {
    /// A pool of `size` workers. At least one worker is always started.
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Apply `operation` to every item using the pool's workers and return
    /// the produced values once all of them are processed.
    ///
    /// Each item is processed exactly once. Values are returned in completion
    /// order. The first error stops workers from starting new items; items
    /// already in flight finish, the rest are dropped and the error is
    /// returned.
    pub fn run<I, O, E, F>(&self, items: Vec<I>, operation: F) -> Result<Vec<O>, E>
    where
        I: Send,
        O: Send,
        E: Send,
        F: Fn(I) -> Result<O, E> + Sync,
    {
        let total = items.len();
        let queue = WorkQueue::new();
        for item in items {
            queue.enqueue(item);
        }

        let outputs = Mutex::new(Vec::with_capacity(total));
        let failure = Mutex::new(None);
        let failed = AtomicBool::new(false);
        let workers = self.size.min(total.max(1));
        debug!("Processing {} items with {} workers", total, workers);

        thread::scope(|scope| {
            for worker in 0..workers {
                let (queue, outputs, failure, failed, operation) =
                    (&queue, &outputs, &failure, &failed, &operation);
                scope.spawn(move || {
                    while let Some(item) = queue.try_dequeue() {
                        let _done = TaskGuard(queue);
                        if failed.load(Ordering::Acquire) {
                            continue;
                        }
                        match operation(item) {
                            Ok(output) => outputs
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .push(output),
                            Err(err) => {
                                failed.store(true, Ordering::Release);
                                failure
                                    .lock()
                                    .unwrap_or_else(PoisonError::into_inner)
                                    .get_or_insert(err);
                            }
                        }
                    }
                    trace!("Worker {} done", worker);
                });
            }
            queue.join();
        });

        if let Some(err) = failure.into_inner().unwrap_or_else(PoisonError::into_inner) {
            return Err(err);
        }
        Ok(outputs.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::atomic::AtomicUsize,
        time::Duration,
    };

    use ntest::timeout;

    use super::*;

    #[test]
    fn size_is_at_least_one() {
        assert_eq!(WorkerPool::new(0).size(), 1);
        assert_eq!(WorkerPool::new(4).size(), 4);
        assert_eq!(WorkerPool::default().size(), DEFAULT_POOL_SIZE);
    }

    #[test]
    #[timeout(10000)]
    fn every_item_processed_exactly_once() {
        let calls = AtomicUsize::new(0);
        let result: Result<Vec<u32>, ()> = WorkerPool::new(20).run((0..50).collect(), |item| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(item * 2)
        });

        let outputs = result.expect("no item fails");
        assert_eq!(calls.load(Ordering::SeqCst), 50);
        let outputs: HashSet<_> = outputs.into_iter().collect();
        assert_eq!(outputs, (0..50).map(|i| i * 2).collect());
    }

    #[test]
    #[timeout(5000)]
    fn empty_input_returns_empty() {
        let result: Result<Vec<()>, ()> = WorkerPool::new(3).run(Vec::<u8>::new(), |_| Ok(()));
        assert_eq!(result, Ok(vec![]));
    }

    #[test]
    #[timeout(5000)]
    fn more_workers_than_items() {
        let result: Result<Vec<&str>, ()> =
            WorkerPool::new(20).run(vec!["K64F", "LPC1768"], Ok);
        let mut outputs = result.expect("no item fails");
        outputs.sort();
        assert_eq!(outputs, vec!["K64F", "LPC1768"]);
    }

    #[test]
    #[timeout(10000)]
    fn workers_run_concurrently() {
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let result: Result<Vec<()>, ()> = WorkerPool::new(4).run((0..8).collect(), |_: i32| {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(200));
            running.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        });
        assert!(result.is_ok());
        assert!(peak.load(Ordering::SeqCst) > 1);
    }

    #[test]
    #[timeout(5000)]
    fn first_error_is_returned_and_stops_new_work() {
        let calls = AtomicUsize::new(0);
        let result: Result<Vec<u32>, String> = WorkerPool::new(1).run((0..10).collect(), |item| {
            calls.fetch_add(1, Ordering::SeqCst);
            if item == 3 {
                Err(format!("item {item} failed"))
            } else {
                Ok(item)
            }
        });
        assert_eq!(result, Err(String::from("item 3 failed")));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
