//! Asynchronous task submission queue

use super::device::Device;
use super::event::{Event, EventStatus};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Execution context handed to a running task
///
/// `parallel_for` is the work-item grid: the closure runs once per index,
/// distributed over the queue's worker pool with no ordering guarantee among
/// indices.
pub struct TaskScope<'a> {
    pool: &'a rayon::ThreadPool,
    device: &'a Device,
}

impl TaskScope<'_> {
    /// Run `body` for every index in `[0, n)`, distributed over the pool
    pub fn parallel_for<F>(&self, n: usize, body: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        if n == 0 {
            return;
        }
        self.pool.install(|| (0..n).into_par_iter().for_each(body));
    }

    /// The device this task executes on
    pub fn device(&self) -> &Device {
        self.device
    }
}

struct QueueInner {
    device: Device,
    pool: rayon::ThreadPool,
    pending: Mutex<Vec<Event>>,
    next_task_id: AtomicU64,
}

/// Device execution queue
///
/// `submit` never blocks the caller: each task gets an orchestration thread
/// that first waits on the task's dependency events, then runs the body on
/// the shared worker pool. Only explicit dependency edges order tasks.
///
/// There is no cancellation or timeout; a submitted task runs to completion
/// or fails, and teardown is the owner's concern.
#[derive(Clone)]
pub struct Queue {
    inner: Arc<QueueInner>,
}

impl Queue {
    /// Create a queue over `device`, with one worker per compute unit
    pub fn new(device: Device) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(device.compute_units())
            .thread_name(|i| format!("ndkern-worker-{i}"))
            .build()
            .map_err(|e| Error::Backend(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(QueueInner {
                device,
                pool,
                pending: Mutex::new(Vec::new()),
                next_task_id: AtomicU64::new(0),
            }),
        })
    }

    /// The device this queue schedules onto
    pub fn device(&self) -> &Device {
        &self.inner.device
    }

    /// Submit a task, returning its completion event immediately
    ///
    /// The task starts once every event in `depends` completes. A dependency
    /// failure, an `Err` return, or a panic inside the task marks the event
    /// failed; dependents then fail transitively.
    pub fn submit<F>(&self, depends: &[Event], task: F) -> Event
    where
        F: FnOnce(&TaskScope<'_>) -> std::result::Result<(), String> + Send + 'static,
    {
        let event = Event::new();
        let task_id = self.inner.next_task_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut pending = self.inner.pending.lock();
            pending.retain(|e| e.status() == EventStatus::Pending);
            pending.push(event.clone());
        }

        log::trace!(
            "queue: submitting task {task_id} with {} dependencies",
            depends.len()
        );

        let deps: Vec<Event> = depends.to_vec();
        let inner = Arc::clone(&self.inner);
        let completion = event.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("ndkern-task-{task_id}"))
            .spawn(move || {
                for dep in &deps {
                    if let Err(err) = dep.wait() {
                        log::debug!("queue: task {task_id} aborted, dependency failed: {err}");
                        completion.fail(format!("dependency failed: {err}"));
                        return;
                    }
                }
                let scope = TaskScope {
                    pool: &inner.pool,
                    device: &inner.device,
                };
                match catch_unwind(AssertUnwindSafe(|| task(&scope))) {
                    Ok(Ok(())) => completion.complete(),
                    Ok(Err(message)) => {
                        log::debug!("queue: task {task_id} failed: {message}");
                        completion.fail(message);
                    }
                    Err(_) => {
                        log::debug!("queue: task {task_id} panicked");
                        completion.fail("task panicked".to_string());
                    }
                }
            });
        if let Err(err) = spawned {
            event.fail(format!("failed to spawn task thread: {err}"));
        }
        event
    }

    /// Wait for every outstanding task, surfacing the first failure
    pub fn synchronize(&self) -> Result<()> {
        let events: Vec<Event> = {
            let mut pending = self.inner.pending.lock();
            pending.drain(..).collect()
        };
        for event in events {
            event.wait()?;
        }
        Ok(())
    }
}
