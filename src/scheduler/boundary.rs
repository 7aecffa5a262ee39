//! Cross-thread hand-off at the head of a pipeline

use super::Scheduler;
use crate::chain::{Chainable, Listener, Listeners, NodeKind};
use crate::input::CursorEvent;
use std::sync::Arc;

/// Re-posts every event onto the scheduler's thread before forwarding it.
///
/// The event is cloned on the producer side, so the caller may reuse its
/// buffers as soon as `process` returns.
pub struct SchedulerBoundary {
    scheduler: Arc<dyn Scheduler>,
    listeners: Arc<Listeners<CursorEvent>>,
}

impl SchedulerBoundary {
    /// Boundary posting onto `scheduler`.
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            listeners: Arc::new(Listeners::new()),
        }
    }
}

impl Listener<CursorEvent> for SchedulerBoundary {
    fn process(&self, event: &CursorEvent) {
        let event = event.clone();
        let listeners = self.listeners.clone();
        let job = Box::new(move || listeners.emit(&event));
        if let Err(e) = self.scheduler.schedule(job) {
            tracing::warn!("Dropping cursor event: {}", e);
        }
    }
}

impl Chainable<CursorEvent> for SchedulerBoundary {
    fn kind(&self) -> NodeKind {
        NodeKind::Boundary
    }

    fn listeners(&self) -> &Listeners<CursorEvent> {
        &self.listeners
    }
}
