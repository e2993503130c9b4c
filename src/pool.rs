// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! A bounded set of workers that request handlers run on.

use futures::prelude::*;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::{sync::Semaphore, task::JoinSet};

/// The number of workers the server runs with unless configured otherwise.
pub const DEFAULT_WORKERS: usize = 10;

/// Limits the number of request handlers running at once across all connections.
///
/// Each running handler holds one of `workers` permits. A handler that cannot get a permit
/// waits, which in turn stops its connection from reading further requests until a worker frees
/// up. Running handlers are tracked so that [`close`](WorkerPool::close) can abort them.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    workers: u32,
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl WorkerPool {
    /// Returns a pool of `workers` workers.
    ///
    /// # Panics
    ///
    /// If `workers` is zero or larger than the semaphore can track.
    pub fn new(workers: usize) -> Self {
        assert!(workers > 0, "a worker pool needs at least one worker");
        let workers = u32::try_from(workers)
            .ok()
            .filter(|&n| n as usize <= Semaphore::MAX_PERMITS)
            .expect("too many workers");
        WorkerPool {
            permits: Arc::new(Semaphore::new(workers as usize)),
            workers,
            tasks: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// The pool's bound.
    pub fn workers(&self) -> usize {
        self.workers as usize
    }

    /// The number of workers currently running a task.
    pub fn in_flight(&self) -> usize {
        self.workers() - self.permits.available_permits()
    }

    /// Waits for a free worker and then runs `task` on it. The returned future completes once
    /// the task has been handed to a worker, not when the task finishes. Tasks submitted after
    /// [`close`](WorkerPool::close) are dropped without running.
    pub fn spawn<F>(&self, task: F) -> impl Future<Output = ()> + Send + 'static
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = self.permits.clone();
        let tasks = self.tasks.clone();
        async move {
            match permits.acquire_owned().await {
                Ok(permit) => track(&tasks, async move {
                    task.await;
                    drop(permit);
                }),
                Err(_) => tracing::debug!("Worker pool closed; dropping task."),
            }
        }
    }

    /// Resolves once no worker is running a task.
    pub async fn idle(&self) {
        if let Ok(all) = self.permits.acquire_many(self.workers).await {
            drop(all);
        }
    }

    /// Stops handing out workers and aborts every task still running. Returns the number of
    /// tasks aborted.
    pub fn close(&self) -> usize {
        self.permits.close();
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while tasks.try_join_next().is_some() {}
        let running = tasks.len();
        tasks.abort_all();
        running
    }
}

fn track<F>(tasks: &Mutex<JoinSet<()>>, task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let mut tasks = tasks.lock().unwrap_or_else(PoisonError::into_inner);
    // Reap finished tasks.
    while tasks.try_join_next().is_some() {}
    tasks.spawn(task);
}

#[cfg(test)]
mod tests {
    use super::WorkerPool;
    use futures::future::{self, join_all};
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn runs_at_most_workers_tasks_at_once() {
        let pool = WorkerPool::new(3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx): (Vec<_>, Vec<_>) = (0..12).map(|_| oneshot::channel()).unzip();

        let submit = done_tx.into_iter().map(|done: oneshot::Sender<()>| {
            let running = running.clone();
            let peak = peak.clone();
            pool.spawn(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                let _ = done.send(());
            })
        });
        // Submission waits for workers, so it must run alongside the tasks it submits.
        let submit = tokio::spawn(join_all(submit));
        for done in done_rx {
            done.await.unwrap();
        }
        submit.await.unwrap();
        pool.idle().await;

        assert_eq!(peak.load(Ordering::SeqCst), 3);
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test]
    async fn idle_waits_for_running_tasks() {
        let pool = WorkerPool::new(2);
        let (release, hold) = oneshot::channel::<()>();
        pool.spawn(async move {
            let _ = hold.await;
        })
        .await;
        assert_eq!(pool.in_flight(), 1);

        let idle = tokio::time::timeout(Duration::from_millis(20), pool.idle()).await;
        assert!(idle.is_err(), "pool reported idle with a task running");

        release.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), pool.idle())
            .await
            .expect("pool never became idle");
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test]
    async fn close_aborts_running_tasks_and_rejects_new_ones() {
        let pool = WorkerPool::new(2);
        let (aborted_tx, aborted_rx) = oneshot::channel::<()>();
        pool.spawn(async move {
            // Dropped, closing the channel, only when the task is aborted.
            let _aborted = aborted_tx;
            future::pending::<()>().await
        })
        .await;
        assert_eq!(pool.in_flight(), 1);

        assert_eq!(pool.close(), 1);
        tokio::time::timeout(Duration::from_secs(5), aborted_rx)
            .await
            .expect("task was not aborted")
            .unwrap_err();

        let ran = Arc::new(AtomicUsize::new(0));
        pool.spawn({
            let ran = ran.clone();
            async move {
                ran.fetch_add(1, Ordering::SeqCst);
            }
        })
        .await;
        tokio::task::yield_now().await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    #[should_panic(expected = "at least one worker")]
    fn zero_workers_is_rejected() {
        let _ = WorkerPool::new(0);
    }
}
