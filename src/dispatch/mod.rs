//! Cursor-to-target dispatch
//!
//! Partitions a flat cursor set into one event per touched target. A cursor is
//! hit-tested only when its id is first seen; after that it sticks to the same
//! target until it disappears from the input, however far it moves.

use crate::chain::{Chainable, Listener, Listeners, NodeKind};
use crate::config::DispatchConfig;
use crate::input::{Cursor, CursorEvent, CursorId};
use crate::target::{ScreenTarget, TargetHandle};
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashMap;

#[derive(Default)]
struct DispatchState {
    /// Registered targets, top-most first
    targets: Vec<TargetHandle>,
    /// Owner of cursors that hit no registered target
    fallback: Option<TargetHandle>,
    /// Assignment made in the previous cycle
    assignments: HashMap<CursorId, TargetHandle>,
    /// Targets that owned cursors in the previous cycle, in emit order
    owners: Vec<TargetHandle>,
}

impl DispatchState {
    fn is_registered(&self, target: &TargetHandle) -> bool {
        self.fallback.as_ref() == Some(target) || self.targets.contains(target)
    }

    fn hit_test(&self, cursor: &Cursor) -> Option<TargetHandle> {
        self.targets
            .iter()
            .find(|target| target.is_touched(cursor))
            .or(self.fallback.as_ref())
            .cloned()
    }

    fn owner(&self, cursor: &Cursor) -> Option<TargetHandle> {
        match self.assignments.get(&cursor.id) {
            Some(target) if self.is_registered(target) => Some(target.clone()),
            _ => {
                let hit = self.hit_test(cursor);
                if let Some(target) = &hit {
                    tracing::debug!(cursor = cursor.id, target = target.name(), "Cursor assigned");
                }
                hit
            }
        }
    }

    fn dispatch(&mut self, event: &CursorEvent) -> Vec<CursorEvent> {
        let mut groups: Vec<(TargetHandle, Vec<Cursor>)> = Vec::new();
        let mut assignments = HashMap::with_capacity(event.cursors.len());

        for cursor in &event.cursors {
            let Some(target) = self.owner(cursor) else {
                tracing::trace!(cursor = cursor.id, x = cursor.x, y = cursor.y, "Dropping unassigned cursor");
                continue;
            };
            match groups.iter_mut().find(|(owner, _)| *owner == target) {
                Some((_, cursors)) => cursors.push(*cursor),
                None => groups.push((target.clone(), vec![*cursor])),
            }
            assignments.insert(cursor.id, target);
        }

        let mut out: Vec<CursorEvent> = groups
            .iter()
            .map(|(target, cursors)| event.with_cursors(cursors.clone()).for_target(target.clone()))
            .collect();

        for previous in &self.owners {
            if !groups.iter().any(|(target, _)| target == previous) {
                tracing::debug!(target = previous.name(), "All cursors lifted from target");
                out.push(event.with_cursors(Vec::new()).for_target(previous.clone()));
            }
        }

        self.assignments = assignments;
        self.owners = groups.into_iter().map(|(target, _)| target).collect();
        out
    }
}

/// Sticky cursor-to-target dispatcher
pub struct Dispatcher {
    state: ParkingMutex<DispatchState>,
    listeners: Listeners<CursorEvent>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher without targets; unmatched cursors are dropped.
    pub fn new() -> Self {
        Self {
            state: ParkingMutex::new(DispatchState::default()),
            listeners: Listeners::new(),
        }
    }

    /// Cursors that hit no registered target go to `fallback` instead of being dropped.
    pub fn with_fallback(fallback: TargetHandle) -> Self {
        let dispatcher = Self::new();
        dispatcher.state.lock().fallback = Some(fallback);
        dispatcher
    }

    /// Dispatcher with a screen fallback if the config asks for one.
    pub fn from_config(config: &DispatchConfig) -> Self {
        if config.fallback_to_screen {
            Self::with_fallback(TargetHandle::new(ScreenTarget::new(
                config.screen_width,
                config.screen_height,
            )))
        } else {
            Self::new()
        }
    }

    /// Target that receives cursors hitting nothing else.
    pub fn fallback(&self) -> Option<TargetHandle> {
        self.state.lock().fallback.clone()
    }

    /// Register `target` above every other target. Re-adding raises it.
    pub fn add_target(&self, target: TargetHandle) {
        let mut state = self.state.lock();
        state.targets.retain(|t| *t != target);
        state.targets.insert(0, target);
    }

    /// Register `target` below every other target. Re-adding lowers it.
    pub fn add_target_bottom(&self, target: TargetHandle) {
        let mut state = self.state.lock();
        state.targets.retain(|t| *t != target);
        state.targets.push(target);
    }

    /// Unregister `target`. Its cursors are hit-tested again on the next
    /// cycle, and it receives a lift event then.
    pub fn remove_target(&self, target: &TargetHandle) -> bool {
        let mut state = self.state.lock();
        let before = state.targets.len();
        state.targets.retain(|t| t != target);
        state.targets.len() != before
    }

    /// Registered targets, top-most first.
    pub fn targets(&self) -> Vec<TargetHandle> {
        self.state.lock().targets.clone()
    }

    /// Target the cursor was assigned to in the last cycle.
    pub fn owner_of(&self, cursor: CursorId) -> Option<TargetHandle> {
        self.state.lock().assignments.get(&cursor).cloned()
    }

    /// Number of cursors assigned in the last cycle.
    pub fn assignment_count(&self) -> usize {
        self.state.lock().assignments.len()
    }

    /// Run one dispatch cycle and return the per-target events without
    /// forwarding them.
    pub fn dispatch(&self, event: &CursorEvent) -> Vec<CursorEvent> {
        self.state.lock().dispatch(event)
    }
}

impl Listener<CursorEvent> for Dispatcher {
    fn process(&self, event: &CursorEvent) {
        for targeted in self.dispatch(event) {
            self.listeners.emit(&targeted);
        }
    }
}

impl Chainable<CursorEvent> for Dispatcher {
    fn kind(&self) -> NodeKind {
        NodeKind::Dispatcher
    }

    fn listeners(&self) -> &Listeners<CursorEvent> {
        &self.listeners
    }
}
