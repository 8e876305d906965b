// src/crawl/queue.rs
// =============================================================================
// The shared work queue the crawl workers pull from.
//
// How it works:
// 1. Every unit of work (fetch a sitemap, scan a page, probe a link) is a Task
// 2. push() adds a task and bumps the `pending` counter
// 3. Workers call next() to take a task, run it, then call finish()
// 4. A task may push more tasks while it runs (a sitemap index pushes its
//    children, a page pushes the links it found)
// 5. next() returns None once the queue is empty AND nothing is running,
//    because only a running task could still add more work
//
// `pending` counts queued + running tasks. It's incremented before a task is
// visible in the deque and decremented only after the task's children have
// been pushed, so it can't hit zero while work remains.
//
// Rust concepts:
// - VecDeque: FIFO queue (push_back / pop_front)
// - AtomicUsize: a counter shared between workers without a lock
// - tokio::sync::Notify: lets idle workers sleep until something changes
// =============================================================================

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

// One unit of crawl work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Fetch and parse a sitemap document
    Sitemap { url: String },
    /// Scan a page listed in a sitemap (or validate it, if it's an asset);
    /// `links_log` is the file its discovered links are appended to
    Page {
        url: String,
        origin: String,
        links_log: Option<PathBuf>,
    },
    /// HEAD-probe a link found on `origin`
    Validate { url: String, origin: String },
}

#[derive(Debug, Default)]
pub struct WorkQueue {
    tasks: Mutex<VecDeque<Task>>,
    pending: AtomicUsize,
    notify: Notify,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, task: Task) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.tasks().push_back(task);
        self.notify.notify_waiters();
    }

    // Waits for the next task; None means the crawl is finished
    pub async fn next(&self) -> Option<Task> {
        loop {
            // Register interest *before* looking, so a push or finish that
            // lands between the checks below still wakes us
            let notified = self.notify.notified();

            let popped = self.tasks().pop_front();
            if let Some(task) = popped {
                return Some(task);
            }

            if self.pending.load(Ordering::SeqCst) == 0 {
                return None;
            }

            notified.await;
        }
    }

    // Marks one task returned by next() as done
    pub fn finish(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Last task done: wake everyone so they can observe the end
            self.notify.notify_waiters();
        }
    }

    // Calls finish() when dropped, including while unwinding from a panic,
    // so a crashed task can't leave the other workers waiting forever
    pub fn finish_guard(&self) -> FinishGuard<'_> {
        FinishGuard { queue: self }
    }

    /// Queued plus running tasks
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    fn tasks(&self) -> MutexGuard<'_, VecDeque<Task>> {
        // A panicking worker can't leave the deque half-modified, so a
        // poisoned lock is still safe to use
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct FinishGuard<'a> {
    queue: &'a WorkQueue,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.queue.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn sitemap(url: &str) -> Task {
        Task::Sitemap { url: url.to_string() }
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = WorkQueue::new();
        queue.push(sitemap("a"));
        queue.push(sitemap("b"));
        assert_eq!(queue.pending(), 2);

        assert_eq!(queue.next().await, Some(sitemap("a")));
        assert_eq!(queue.next().await, Some(sitemap("b")));
    }

    #[tokio::test]
    async fn test_empty_queue_ends_immediately() {
        let queue = WorkQueue::new();
        assert_eq!(queue.next().await, None);
    }

    #[tokio::test]
    async fn test_idle_worker_waits_for_running_task() {
        let queue = Arc::new(WorkQueue::new());
        queue.push(sitemap("root"));
        let root = queue.next().await;
        assert!(root.is_some());

        // Another worker finds the deque empty but a task still running
        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.next().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        // The running task discovers a child, then completes
        queue.push(sitemap("child"));
        queue.finish();

        let got = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, Some(sitemap("child")));
    }

    #[tokio::test]
    async fn test_idle_workers_released_when_last_task_finishes() {
        let queue = Arc::new(WorkQueue::new());
        queue.push(sitemap("only"));
        let _ = queue.next().await;

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let queue = queue.clone();
                tokio::spawn(async move { queue.next().await })
            })
            .collect();
        tokio::time::sleep(Duration::from_millis(20)).await;

        queue.finish();
        assert_eq!(queue.pending(), 0);

        for waiter in waiters {
            let got = tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(got, None);
        }
    }

    #[tokio::test]
    async fn test_finish_guard_releases_on_panic() {
        let queue = Arc::new(WorkQueue::new());
        queue.push(sitemap("boom"));

        let crashed = {
            let queue = queue.clone();
            tokio::spawn(async move {
                if let Some(_task) = queue.next().await {
                    let _done = queue.finish_guard();
                    panic!("task failed");
                }
            })
        };
        assert!(crashed.await.is_err());

        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.next().await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_workers_drain_fan_out() {
        // Each task at depth < 3 spawns three children: 1 + 3 + 9 + 27 tasks
        let queue = Arc::new(WorkQueue::new());
        let processed = Arc::new(AtomicUsize::new(0));
        queue.push(sitemap("0"));

        let workers: Vec<_> = (0..3)
            .map(|_| {
                let queue = queue.clone();
                let processed = processed.clone();
                tokio::spawn(async move {
                    while let Some(Task::Sitemap { url }) = queue.next().await {
                        if url.len() < 4 {
                            for i in 0..3 {
                                queue.push(sitemap(&format!("{}{}", url, i)));
                            }
                        }
                        processed.fetch_add(1, Ordering::SeqCst);
                        queue.finish();
                    }
                })
            })
            .collect();

        for worker in workers {
            tokio::time::timeout(Duration::from_secs(5), worker)
                .await
                .unwrap()
                .unwrap();
        }

        assert_eq!(processed.load(Ordering::SeqCst), 40);
        assert_eq!(queue.pending(), 0);
    }
}
