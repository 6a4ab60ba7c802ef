//! Timers behind a trait so the controller can be driven by a fake clock.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::AbortHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};

/// A unit of scheduled work. Called once per firing.
pub type Job = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

type Canceller = Box<dyn FnOnce() + Send + Sync>;

pub trait Scheduler: Send + Sync {
    /// Run `job` every `period`, first firing one period from now.
    fn every(&self, period: Duration, job: Job) -> TaskHandle;

    /// Run `job` once after `delay`.
    fn after(&self, delay: Duration, job: Job) -> TaskHandle;
}

/// Cancels its task on [`TaskHandle::cancel`] or when dropped.
///
/// Cancelling only stops future firings; a job that already started keeps
/// running to completion.
pub struct TaskHandle {
    canceller: Option<Canceller>,
}

impl TaskHandle {
    #[must_use]
    pub fn new<F>(canceller: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            canceller: Some(Box::new(canceller)),
        }
    }

    #[must_use]
    pub fn from_abort(handle: AbortHandle) -> Self {
        Self::new(move || handle.abort())
    }

    pub fn cancel(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(canceller) = self.canceller.take() {
            canceller();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.fire();
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("armed", &self.canceller.is_some())
            .finish()
    }
}

/// [`Scheduler`] on tokio timers.
///
/// Each firing spawns the job as its own task, so slow jobs never hold up
/// the next tick and cancelling the schedule leaves started jobs alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[allow(clippy::infinite_loop)]
async fn run_every(period: Duration, job: Job) {
    let mut ticker = interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        tokio::spawn(job());
    }
}

impl Scheduler for TokioScheduler {
    fn every(&self, period: Duration, job: Job) -> TaskHandle {
        let task = tokio::spawn(run_every(period, job));
        TaskHandle::from_abort(task.abort_handle())
    }

    fn after(&self, delay: Duration, job: Job) -> TaskHandle {
        let task = tokio::spawn(async move {
            sleep(delay).await;
            tokio::spawn(job());
        });
        TaskHandle::from_abort(task.abort_handle())
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
