use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

use crate::error::{Error, Result};

/// Runs one-shot jobs at a wall-clock deadline on the ambient tokio runtime.
///
/// Jobs are plain closures; anything that touches shared state must take the
/// store lock itself. [`Scheduler::cancel_all`] drops every pending job and
/// [`Scheduler::shutdown`] additionally waits for in-flight tasks to finish.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    tracker: TaskTracker,
    /// Replaced with a fresh token on every `cancel_all`.
    cancel: Mutex<CancellationToken>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                tracker: TaskTracker::new(),
                cancel: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    /// Capture everything a job needs to be spawned later. Fails only when
    /// called outside a tokio runtime, so callers reserve before mutating
    /// state and spawn afterwards.
    pub fn reserve(&self) -> Result<Slot> {
        let handle = Handle::try_current()
            .map_err(|e| Error::Internal(anyhow!("no async runtime for scheduled work: {}", e)))?;
        Ok(Slot {
            handle,
            token: self.current_token()?,
            tracker: self.inner.tracker.clone(),
        })
    }

    /// Run `job` once `when` has passed. Returns immediately.
    pub fn schedule_at<F>(&self, when: DateTime<Utc>, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.reserve()?.run_at(when, job);
        Ok(())
    }

    /// Cancel everything scheduled so far. Later jobs are unaffected.
    pub fn cancel_all(&self) -> Result<()> {
        let mut cancel = self
            .inner
            .cancel
            .lock()
            .map_err(|e| Error::Internal(anyhow!("scheduler lock poisoned: {}", e)))?;
        cancel.cancel();
        *cancel = CancellationToken::new();
        Ok(())
    }

    /// Number of jobs that have not yet fired or been cancelled.
    pub fn pending(&self) -> usize {
        self.inner.tracker.len()
    }

    /// Cancel pending jobs and wait for every task to wind down.
    pub async fn shutdown(&self) -> Result<()> {
        self.cancel_all()?;
        self.inner.tracker.close();
        self.inner.tracker.wait().await;
        Ok(())
    }

    fn current_token(&self) -> Result<CancellationToken> {
        let cancel = self
            .inner
            .cancel
            .lock()
            .map_err(|e| Error::Internal(anyhow!("scheduler lock poisoned: {}", e)))?;
        Ok(cancel.clone())
    }
}

/// A reserved place on the scheduler; spawning through it cannot fail.
pub struct Slot {
    handle: Handle,
    token: CancellationToken,
    tracker: TaskTracker,
}

impl Slot {
    pub fn run_at<F>(self, when: DateTime<Utc>, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = (when - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        let token = self.token;

        debug!("Scheduling job in {:?}", delay);
        self.tracker.spawn_on(
            async move {
                tokio::select! {
                    _ = token.cancelled() => debug!("Scheduled job cancelled"),
                    _ = tokio::time::sleep(delay) => job(),
                }
            },
            &self.handle,
        );
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
