//! Membership gates
//!
//! Stateless apart from the configured set: an event either passes unchanged
//! or is dropped.

use crate::chain::{Chainable, Listener, Listeners, NodeKind};
use crate::input::{CursorEvent, UserId};
use crate::target::{TargetHandle, TargetRegistry};
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashSet;

/// Whether membership in the set lets an event through or stops it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    Include,
    Exclude,
}

impl GateMode {
    fn passes(self, member: bool) -> bool {
        match self {
            GateMode::Include => member,
            GateMode::Exclude => !member,
        }
    }
}

/// Gates targeted events on target identity
///
/// Targets are held weakly. Events without a target are never members.
pub struct TargetFilter {
    mode: GateMode,
    targets: ParkingMutex<TargetRegistry<()>>,
    listeners: Listeners<CursorEvent>,
}

impl TargetFilter {
    /// Gate over an initial set of targets.
    pub fn new<I>(mode: GateMode, targets: I) -> Self
    where
        I: IntoIterator<Item = TargetHandle>,
    {
        let mut registry = TargetRegistry::new();
        for target in targets {
            registry.get_or_insert_with(&target, || ());
        }
        Self {
            mode,
            targets: ParkingMutex::new(registry),
            listeners: Listeners::new(),
        }
    }

    /// Pass only events addressed to one of `targets`.
    pub fn include<I: IntoIterator<Item = TargetHandle>>(targets: I) -> Self {
        Self::new(GateMode::Include, targets)
    }

    /// Drop events addressed to any of `targets`.
    pub fn exclude<I: IntoIterator<Item = TargetHandle>>(targets: I) -> Self {
        Self::new(GateMode::Exclude, targets)
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Add `target` to the set without keeping it alive.
    pub fn add_target(&self, target: &TargetHandle) {
        self.targets.lock().get_or_insert_with(target, || ());
    }

    /// Remove `target` from the set. Returns whether it was present.
    pub fn remove_target(&self, target: &TargetHandle) -> bool {
        self.targets.lock().release(target).is_some()
    }

    fn passes(&self, event: &CursorEvent) -> bool {
        let member = match &event.target {
            Some(target) => self.targets.lock().contains(target),
            None => false,
        };
        self.mode.passes(member)
    }
}

impl Listener<CursorEvent> for TargetFilter {
    fn process(&self, event: &CursorEvent) {
        if self.passes(event) {
            self.listeners.emit(event);
        }
    }
}

impl Chainable<CursorEvent> for TargetFilter {
    fn kind(&self) -> NodeKind {
        NodeKind::Filter
    }

    fn listeners(&self) -> &Listeners<CursorEvent> {
        &self.listeners
    }
}

/// Gates events on the user that produced them
///
/// Events without a user are never members.
pub struct UserFilter {
    mode: GateMode,
    users: ParkingMutex<HashSet<UserId>>,
    listeners: Listeners<CursorEvent>,
}

impl UserFilter {
    /// Gate over an initial set of users.
    pub fn new<I>(mode: GateMode, users: I) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        Self {
            mode,
            users: ParkingMutex::new(users.into_iter().collect()),
            listeners: Listeners::new(),
        }
    }

    /// Pass only events from one of `users`.
    pub fn include<I: IntoIterator<Item = UserId>>(users: I) -> Self {
        Self::new(GateMode::Include, users)
    }

    /// Drop events from any of `users`.
    pub fn exclude<I: IntoIterator<Item = UserId>>(users: I) -> Self {
        Self::new(GateMode::Exclude, users)
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Add `user` to the set.
    pub fn add_user(&self, user: UserId) {
        self.users.lock().insert(user);
    }

    /// Remove `user` from the set. Returns whether it was present.
    pub fn remove_user(&self, user: UserId) -> bool {
        self.users.lock().remove(&user)
    }

    fn passes(&self, event: &CursorEvent) -> bool {
        let member = event
            .user
            .map_or(false, |user| self.users.lock().contains(&user));
        self.mode.passes(member)
    }
}

impl Listener<CursorEvent> for UserFilter {
    fn process(&self, event: &CursorEvent) {
        if self.passes(event) {
            self.listeners.emit(event);
        }
    }
}

impl Chainable<CursorEvent> for UserFilter {
    fn kind(&self) -> NodeKind {
        NodeKind::Filter
    }

    fn listeners(&self) -> &Listeners<CursorEvent> {
        &self.listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Cursor;
    use crate::target::RectTarget;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting<C: Chainable<CursorEvent>>(node: &C) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let sink = count.clone();
        node.queue(Arc::new(move |_: &CursorEvent| {
            sink.fetch_add(1, Ordering::SeqCst);
        }));
        count
    }

    fn target(label: &str) -> TargetHandle {
        TargetHandle::new(RectTarget::new(label, 0, 0, 10, 10))
    }

    #[test]
    fn test_include_target_passes_members_only() {
        let a = target("a");
        let b = target("b");
        let gate = TargetFilter::include([a.clone()]);
        let count = counting(&gate);

        gate.process(&CursorEvent::new(vec![]).for_target(a.clone()));
        gate.process(&CursorEvent::new(vec![Cursor::new(1, 1, 1)]).for_target(b));
        gate.process(&CursorEvent::new(vec![Cursor::new(1, 1, 1)]));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_exclude_target_blocks_members() {
        let a = target("a");
        let b = target("b");
        let gate = TargetFilter::exclude([a.clone()]);
        let count = counting(&gate);

        gate.process(&CursorEvent::new(vec![]).for_target(a.clone()));
        gate.process(&CursorEvent::new(vec![]).for_target(b.clone()));
        gate.process(&CursorEvent::new(vec![]));
        assert_eq!(count.load(Ordering::SeqCst), 2);

        assert!(gate.remove_target(&a));
        gate.process(&CursorEvent::new(vec![]).for_target(a));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_target_gate_does_not_keep_targets_alive() {
        let a = target("a");
        let weak = a.downgrade();
        let gate = TargetFilter::include([a]);
        assert!(!weak.is_alive());
        assert_eq!(gate.mode(), GateMode::Include);
    }

    #[test]
    fn test_include_user() {
        let gate = UserFilter::include([1, 2]);
        let count = counting(&gate);

        gate.process(&CursorEvent::new(vec![]).with_user(1));
        gate.process(&CursorEvent::new(vec![]).with_user(3));
        gate.process(&CursorEvent::new(vec![]));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        gate.add_user(3);
        gate.process(&CursorEvent::new(vec![]).with_user(3));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_exclude_user() {
        let gate = UserFilter::exclude([7]);
        let count = counting(&gate);

        gate.process(&CursorEvent::new(vec![]).with_user(7));
        gate.process(&CursorEvent::new(vec![]).with_user(8));
        gate.process(&CursorEvent::new(vec![]));
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(gate.remove_user(7));
    }
}
