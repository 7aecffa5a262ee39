//! Suppresses snapshots identical to the last one forwarded.

use crate::chain::{Chainable, Listener, Listeners, NodeKind};
use crate::input::{Cursor, CursorEvent};
use crate::target::TargetRegistry;
use parking_lot::Mutex as ParkingMutex;

/// Forwards a snapshot only when it differs, as a set, from the previous one
///
/// Memory is kept per target so the filter can sit after the dispatcher
/// without events for different targets suppressing each other.
pub struct NoChangeFilter {
    last: ParkingMutex<LastForwarded>,
    listeners: Listeners<CursorEvent>,
}

#[derive(Default)]
struct LastForwarded {
    untargeted: Option<Vec<Cursor>>,
    targeted: TargetRegistry<Option<Vec<Cursor>>>,
}

impl Default for NoChangeFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl NoChangeFilter {
    /// Filter that has not forwarded anything yet.
    pub fn new() -> Self {
        Self {
            last: ParkingMutex::new(LastForwarded::default()),
            listeners: Listeners::new(),
        }
    }

    /// Forget every remembered snapshot.
    pub fn reset(&self) {
        let mut last = self.last.lock();
        last.untargeted = None;
        last.targeted.clear();
    }

    fn should_forward(&self, event: &CursorEvent) -> bool {
        let mut guard = self.last.lock();
        let last = &mut *guard;
        let previous = match &event.target {
            Some(target) => {
                last.targeted.prune();
                last.targeted.get_or_insert_with(target, || None)
            }
            None => &mut last.untargeted,
        };
        if previous.as_deref().map_or(false, |p| event.same_cursors(p)) {
            return false;
        }
        *previous = Some(event.cursors.clone());
        true
    }
}

impl Listener<CursorEvent> for NoChangeFilter {
    fn process(&self, event: &CursorEvent) {
        if self.should_forward(event) {
            self.listeners.emit(event);
        } else {
            tracing::trace!(cursors = event.len(), "Suppressed unchanged cursor set");
        }
    }
}

impl Chainable<CursorEvent> for NoChangeFilter {
    fn kind(&self) -> NodeKind {
        NodeKind::Filter
    }

    fn listeners(&self) -> &Listeners<CursorEvent> {
        &self.listeners
    }
}
