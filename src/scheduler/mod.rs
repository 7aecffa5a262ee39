//! Scheduling
//!
//! Filters, the dispatcher and recognizers run on one logical thread. Input
//! may arrive on any thread; a [`SchedulerBoundary`] placed at the head of the
//! pipeline re-posts each event through a [`Scheduler`] onto that thread.

pub mod boundary;

pub use boundary::SchedulerBoundary;

use crate::error::{GestureError, GestureResult};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Unit of work posted onto the pipeline thread
pub type Job = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    fn schedule(&self, job: Job) -> GestureResult<()>;
}

/// Runs every job inline on the calling thread.
///
/// Only correct when all input already arrives on the pipeline thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, job: Job) -> GestureResult<()> {
        job();
        Ok(())
    }
}

/// Producer half of a channel-backed scheduler. Jobs posted from one thread
/// run in the order they were posted.
#[derive(Clone)]
pub struct ChannelScheduler {
    sender: UnboundedSender<Job>,
}

/// Consumer half; owns the pipeline thread's job queue
pub struct SchedulerLoop {
    receiver: UnboundedReceiver<Job>,
}

impl ChannelScheduler {
    /// Creates a connected scheduler and loop pair.
    pub fn channel() -> (ChannelScheduler, SchedulerLoop) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (ChannelScheduler { sender }, SchedulerLoop { receiver })
    }

    /// Whether the loop has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Scheduler for ChannelScheduler {
    fn schedule(&self, job: Job) -> GestureResult<()> {
        self.sender
            .send(job)
            .map_err(|_| GestureError::SchedulerClosed)
    }
}

impl SchedulerLoop {
    /// Run jobs until every `ChannelScheduler` has been dropped.
    pub async fn run(mut self) {
        let mut executed = 0usize;
        while let Some(job) = self.receiver.recv().await {
            job();
            executed += 1;
        }
        tracing::debug!(executed, "Scheduler loop finished");
    }

    /// Same as [`run`](Self::run) for a dedicated OS thread. Must not be
    /// called from inside an async runtime.
    pub fn run_blocking(mut self) {
        let mut executed = 0usize;
        while let Some(job) = self.receiver.blocking_recv() {
            job();
            executed += 1;
        }
        tracing::debug!(executed, "Scheduler loop finished");
    }

    /// Run whatever is queued right now without waiting. Returns the number
    /// of jobs executed.
    pub fn drain_pending(&mut self) -> usize {
        let mut executed = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(job) => {
                    job();
                    executed += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        executed
    }

    /// Stop accepting jobs. Already queued jobs can still be drained.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}
