//! Thread-safe FIFO of pending work.

use std::{
    collections::VecDeque,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
};

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    /// Items enqueued but not yet marked done.
    unfinished: usize,
}

/// FIFO queue shared between producers and workers.
///
/// Every dequeued item must be acknowledged with [`WorkQueue::task_done`]
/// once processed; [`WorkQueue::join`] waits for that.
#[derive(Debug)]
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    all_done: Condvar,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                unfinished: 0,
            }),
            all_done: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, item: T) {
        let mut state = self.lock();
        state.items.push_back(item);
        state.unfinished += 1;
    }

    /// Remove the oldest item. `None` means there is no more work: producers
    /// finish before workers start, so an empty queue stays empty.
    pub fn try_dequeue(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Mark one dequeued item as processed.
    pub fn task_done(&self) {
        let mut state = self.lock();
        debug_assert!(state.unfinished > 0, "task_done called too many times");
        state.unfinished = state.unfinished.saturating_sub(1);
        if state.unfinished == 0 {
            self.all_done.notify_all();
        }
    }

    /// Block until every enqueued item has been dequeued and marked done.
    pub fn join(&self) {
        let mut state = self.lock();
        while state.unfinished > 0 {
            state = self
                .all_done
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Items waiting to be dequeued.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::Arc,
        thread,
        time::Duration,
    };

    use ntest::timeout;

    use super::*;

    #[test]
    fn fifo_order() {
        let queue = WorkQueue::new();
        for i in 0..5 {
            queue.enqueue(i);
        }
        assert_eq!(queue.len(), 5);
        let drained: Vec<_> = std::iter::from_fn(|| queue.try_dequeue()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
        assert_eq!(queue.try_dequeue(), None);
    }

    #[test]
    #[timeout(5000)]
    fn join_on_empty_queue_returns() {
        WorkQueue::<u32>::new().join();
    }

    #[test]
    #[timeout(5000)]
    fn join_waits_for_task_done() {
        let queue = Arc::new(WorkQueue::new());
        queue.enqueue("export");

        let worker_queue = Arc::clone(&queue);
        let worker = thread::spawn(move || {
            let item = worker_queue.try_dequeue();
            thread::sleep(Duration::from_millis(100));
            worker_queue.task_done();
            item
        });

        queue.join();
        assert!(queue.is_empty());
        assert_eq!(worker.join().expect("worker panicked"), Some("export"));
    }

    #[test]
    #[timeout(10000)]
    fn concurrent_dequeue_loses_and_duplicates_nothing() {
        let queue = Arc::new(WorkQueue::new());
        for i in 0..1000 {
            queue.enqueue(i);
        }
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(item) = queue.try_dequeue() {
                        seen.push(item);
                        queue.task_done();
                    }
                    seen
                })
            })
            .collect();
        queue.join();

        let mut all: Vec<_> = workers
            .into_iter()
            .flat_map(|w| w.join().expect("worker panicked"))
            .collect();
        all.sort();
        assert_eq!(all, (0..1000).collect::<Vec<_>>());
    }
}
