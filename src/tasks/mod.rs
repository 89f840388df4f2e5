//! Background task manager with pollable progress
//!
//! Every submission gets a fresh [`TaskId`], a progress value starting at 0
//! and exactly one spawned worker. The worker owns the only
//! [`ProgressReporter`] for its id; readers observe the value through a
//! `watch` receiver kept in the task table, so polling never blocks the worker.
//!
//! Finished tasks stay pollable for the configured retention period and are
//! pruned on the next submission after that.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{error, info};

use crate::error::Result;
use crate::types::{TaskId, TaskState, TaskStatus};

mod progress;

pub use progress::ProgressReporter;

#[derive(Clone, Debug)]
struct Lifecycle {
    state: TaskState,
    finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct TaskSlot {
    progress: watch::Receiver<u8>,
    lifecycle: watch::Receiver<Lifecycle>,
    created_at: DateTime<Utc>,
}

impl TaskSlot {
    fn status(&self, task_id: &TaskId) -> TaskStatus {
        let lifecycle = self.lifecycle.borrow().clone();
        TaskStatus {
            task_id: task_id.clone(),
            progress: *self.progress.borrow(),
            state: lifecycle.state,
            created_at: self.created_at,
            finished_at: lifecycle.finished_at,
        }
    }

    fn expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        let retention = chrono::Duration::from_std(retention).unwrap_or(chrono::Duration::MAX);
        match self.lifecycle.borrow().finished_at {
            Some(finished_at) => now - finished_at >= retention,
            None => false,
        }
    }
}

fn prune_expired(
    slots: &mut HashMap<TaskId, TaskSlot>,
    now: DateTime<Utc>,
    retention: Duration,
) -> usize {
    let before = slots.len();
    slots.retain(|_, slot| !slot.expired(now, retention));
    before - slots.len()
}

/// Process-wide table of background tasks
#[derive(Debug)]
pub struct TaskManager {
    slots: RwLock<HashMap<TaskId, TaskSlot>>,
    retention: Duration,
}

impl TaskManager {
    /// Create a manager keeping finished tasks for `retention`
    pub fn new(retention: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            retention,
        }
    }

    /// Register a task and spawn its worker; returns without waiting
    ///
    /// `work` receives the task's [`ProgressReporter`]. Returning `Err` (or
    /// panicking) marks the task failed and leaves progress where it stalled.
    pub async fn submit<F, Fut>(&self, kind: &'static str, work: F) -> TaskId
    where
        F: FnOnce(ProgressReporter) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let task_id = TaskId::generate();
        let (reporter, progress) = ProgressReporter::new();
        let (lifecycle_tx, lifecycle) = watch::channel(Lifecycle {
            state: TaskState::Running,
            finished_at: None,
        });

        {
            let mut slots = self.slots.write().await;
            let now = Utc::now();
            let pruned = prune_expired(&mut slots, now, self.retention);
            if pruned > 0 {
                info!(pruned, "pruned finished tasks");
            }

            slots.insert(
                task_id.clone(),
                TaskSlot {
                    progress,
                    lifecycle,
                    created_at: now,
                },
            );
        }

        info!(task_id = %task_id, kind, "task submitted");

        let id = task_id.clone();
        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(work(reporter)).catch_unwind().await;

            let state = match outcome {
                Ok(Ok(())) => {
                    info!(task_id = %id, kind, "task completed");
                    TaskState::Completed
                }
                Ok(Err(e)) => {
                    error!(task_id = %id, kind, error = %e, "task failed");
                    TaskState::Failed {
                        error: e.to_string(),
                    }
                }
                Err(_) => {
                    error!(task_id = %id, kind, "task panicked");
                    TaskState::Failed {
                        error: "worker panicked".to_string(),
                    }
                }
            };

            let _ = lifecycle_tx.send(Lifecycle {
                state,
                finished_at: Some(Utc::now()),
            });
        });

        task_id
    }

    /// Last recorded progress, or 0 for an unknown id
    pub async fn poll(&self, task_id: &TaskId) -> u8 {
        self.slots
            .read()
            .await
            .get(task_id)
            .map(|slot| *slot.progress.borrow())
            .unwrap_or(0)
    }

    /// Full status of a task, or `None` for an unknown id
    pub async fn status(&self, task_id: &TaskId) -> Option<TaskStatus> {
        self.slots
            .read()
            .await
            .get(task_id)
            .map(|slot| slot.status(task_id))
    }

    /// Wait until the task's worker stops and return its final status
    pub async fn wait(&self, task_id: &TaskId) -> Option<TaskStatus> {
        let mut lifecycle = {
            let slots = self.slots.read().await;
            slots.get(task_id)?.lifecycle.clone()
        };
        // A closed channel means the worker already reported (or vanished)
        let _ = lifecycle.wait_for(|l| l.state.is_finished()).await;
        self.status(task_id).await
    }

    /// Drop finished tasks older than the retention period
    pub async fn prune(&self) -> usize {
        let mut slots = self.slots.write().await;
        prune_expired(&mut slots, Utc::now(), self.retention)
    }

    /// Number of tasks whose worker has not stopped yet
    pub async fn running(&self) -> usize {
        self.slots
            .read()
            .await
            .values()
            .filter(|slot| !slot.lifecycle.borrow().state.is_finished())
            .count()
    }

    /// Number of tasks currently tracked
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Whether no task is tracked
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}
