//! Shared recognizer state machine
//!
//! Every dispatched event for a target is classified by whether the previous
//! and the current cursor counts were valid for the gesture:
//!
//! | previous | current | count     | transition |
//! |----------|---------|-----------|------------|
//! | no       | yes     |           | arm        |
//! | yes      | yes     | unchanged | perform    |
//! | yes      | yes     | changed   | rebase     |
//! | yes      | no      |           | unarm      |
//! | no       | no      |           | idle       |

use super::CursorBounds;
use crate::chain::{Chainable, Listener, Listeners, NodeKind};
use crate::error::GestureResult;
use crate::input::CursorEvent;
use crate::target::{TargetHandle, TargetRegistry};
use parking_lot::Mutex as ParkingMutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Arm,
    Perform,
    Rebase,
    Unarm,
    Idle,
}

impl Transition {
    /// Transition for one event given the previous and current validity.
    pub fn classify(was_valid: bool, is_valid: bool, count_changed: bool) -> Self {
        const Y: bool = true; // to make the table below easier to read
        const N: bool = false;

        #[rustfmt::skip] // keep the table compact and legible
        let transition = match (was_valid, is_valid, count_changed) {
            (N, Y, _) => Transition::Arm,
            (Y, Y, N) => Transition::Perform,
            (Y, Y, Y) => Transition::Rebase,
            (Y, N, _) => Transition::Unarm,
            (N, N, _) => Transition::Idle,
        };
        transition
    }
}

/// One dispatched event as seen by a gesture model
pub struct Sample<'a> {
    pub event: &'a CursorEvent,
    pub target: &'a TargetHandle,
    /// Cursor count of the previous event for this target
    pub previous_count: usize,
}

impl Sample<'_> {
    pub fn count(&self) -> usize {
        self.event.len()
    }
}

/// Edge handlers of one gesture
pub trait GestureModel: Send + 'static {
    /// Per-target state, reset by the model itself when it unarms
    type Context: Default + Send;
    type Event: Send + Sync + 'static;

    const NAME: &'static str;

    fn default_bounds(&self) -> CursorBounds;

    /// Extra validity on top of the cursor count.
    fn accepts(&self, _context: &Self::Context, _sample: &Sample<'_>) -> bool {
        true
    }

    fn arm(&self, context: &mut Self::Context, sample: &Sample<'_>) -> Option<Self::Event>;

    fn perform(&self, context: &mut Self::Context, sample: &Sample<'_>) -> Option<Self::Event>;

    fn rebase(&self, context: &mut Self::Context, sample: &Sample<'_>) -> Option<Self::Event>;

    fn unarm(&self, context: &mut Self::Context, sample: &Sample<'_>, out: &mut Vec<Self::Event>);

    fn idle(&self, _context: &mut Self::Context, _sample: &Sample<'_>) {}
}

struct Slot<C> {
    valid: bool,
    count: usize,
    gesture: C,
}

impl<C: Default> Default for Slot<C> {
    fn default() -> Self {
        Self {
            valid: false,
            count: 0,
            gesture: C::default(),
        }
    }
}

struct RecognizerState<G: GestureModel> {
    model: G,
    bounds: CursorBounds,
    slots: TargetRegistry<Slot<G::Context>>,
}

/// Per-target gesture recognizer
///
/// Consumes targeted cursor events and emits `G::Event`s. Events without a
/// target are ignored.
pub struct Recognizer<G: GestureModel> {
    state: ParkingMutex<RecognizerState<G>>,
    listeners: Listeners<G::Event>,
}

impl<G: GestureModel + Default> Default for Recognizer<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GestureModel + Default> Recognizer<G> {
    /// Recognizer with the model's default cursor bounds.
    pub fn new() -> Self {
        Self::with_model(G::default())
    }

    /// Recognizer accepting `bounds` cursors.
    pub fn with_bounds(bounds: CursorBounds) -> GestureResult<Self> {
        let recognizer = Self::new();
        recognizer.set_cursor_bounds(bounds)?;
        Ok(recognizer)
    }
}

impl<G: GestureModel> Recognizer<G> {
    /// Recognizer driving an explicitly constructed model.
    pub fn with_model(model: G) -> Self {
        let bounds = model.default_bounds();
        Self {
            state: ParkingMutex::new(RecognizerState {
                model,
                bounds,
                slots: TargetRegistry::new(),
            }),
            listeners: Listeners::new(),
        }
    }

    /// Current cursor count bounds.
    pub fn cursor_bounds(&self) -> CursorBounds {
        self.state.lock().bounds
    }

    /// Replace both bounds. Rejected if `min` is zero or above `max`.
    pub fn set_cursor_bounds(&self, bounds: CursorBounds) -> GestureResult<()> {
        bounds.validate()?;
        self.state.lock().bounds = bounds;
        Ok(())
    }

    /// Change the minimum cursor count, keeping the maximum.
    pub fn set_min_cursor_count(&self, min: usize) -> GestureResult<()> {
        let mut state = self.state.lock();
        state.bounds = CursorBounds::new(min, state.bounds.max)?;
        Ok(())
    }

    /// Change the maximum cursor count, keeping the minimum.
    pub fn set_max_cursor_count(&self, max: usize) -> GestureResult<()> {
        let mut state = self.state.lock();
        state.bounds = CursorBounds::new(state.bounds.min, max)?;
        Ok(())
    }

    /// Drop the state kept for `target`. Call when the target is destroyed.
    pub fn release_target(&self, target: &TargetHandle) -> bool {
        self.state.lock().slots.release(target).is_some()
    }

    /// Drop the state of targets that no longer exist.
    pub fn prune_released(&self) -> usize {
        self.state.lock().slots.prune()
    }

    /// Number of targets with live gesture state.
    pub fn tracked_targets(&self) -> usize {
        self.state.lock().slots.len()
    }

    /// Whether a gesture is in progress on `target`.
    pub fn is_armed(&self, target: &TargetHandle) -> bool {
        self.state
            .lock()
            .slots
            .get(target)
            .map_or(false, |slot| slot.valid)
    }

    pub(crate) fn with_model_mut<R>(&self, f: impl FnOnce(&mut G) -> R) -> R {
        f(&mut self.state.lock().model)
    }

    fn step(&self, event: &CursorEvent, target: &TargetHandle) -> Vec<G::Event> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.slots.prune();

        let slot = state.slots.get_or_insert_with(target, Slot::default);
        let sample = Sample {
            event,
            target,
            previous_count: slot.count,
        };
        let count = sample.count();
        let is_valid =
            state.bounds.contains(count) && state.model.accepts(&slot.gesture, &sample);
        let transition = Transition::classify(slot.valid, is_valid, count != slot.count);

        tracing::trace!(
            gesture = G::NAME,
            target = target.name(),
            cursors = count,
            ?transition,
            "Recognizer transition"
        );

        let mut out = Vec::new();
        let model = &state.model;
        match transition {
            Transition::Arm => out.extend(model.arm(&mut slot.gesture, &sample)),
            Transition::Perform => out.extend(model.perform(&mut slot.gesture, &sample)),
            Transition::Rebase => out.extend(model.rebase(&mut slot.gesture, &sample)),
            Transition::Unarm => model.unarm(&mut slot.gesture, &sample, &mut out),
            Transition::Idle => model.idle(&mut slot.gesture, &sample),
        }

        slot.valid = is_valid;
        slot.count = count;
        out
    }
}

impl<G: GestureModel> Listener<CursorEvent> for Recognizer<G> {
    fn process(&self, event: &CursorEvent) {
        let Some(target) = &event.target else {
            tracing::trace!(gesture = G::NAME, "Ignoring untargeted cursor event");
            return;
        };
        // Emit after the state lock is released so listeners may reconfigure us.
        for gesture in self.step(event, target) {
            self.listeners.emit(&gesture);
        }
    }
}

impl<G: GestureModel> Chainable<G::Event> for Recognizer<G> {
    fn kind(&self) -> NodeKind {
        NodeKind::Recognizer
    }

    fn listeners(&self) -> &Listeners<G::Event> {
        &self.listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Cursor;
    use crate::target::{RectTarget, TargetHandle};
    use std::sync::Arc;

    /// Records which edge handler ran.
    #[derive(Default)]
    struct Probe;

    impl GestureModel for Probe {
        type Context = ();
        type Event = Transition;

        const NAME: &'static str = "probe";

        fn default_bounds(&self) -> CursorBounds {
            CursorBounds { min: 1, max: 2 }
        }

        fn arm(&self, _: &mut (), _: &Sample<'_>) -> Option<Transition> {
            Some(Transition::Arm)
        }

        fn perform(&self, _: &mut (), _: &Sample<'_>) -> Option<Transition> {
            Some(Transition::Perform)
        }

        fn rebase(&self, _: &mut (), _: &Sample<'_>) -> Option<Transition> {
            Some(Transition::Rebase)
        }

        fn unarm(&self, _: &mut (), _: &Sample<'_>, out: &mut Vec<Transition>) {
            out.push(Transition::Unarm);
        }
    }

    fn recorded(recognizer: &Recognizer<Probe>) -> Arc<ParkingMutex<Vec<Transition>>> {
        let seen = Arc::new(ParkingMutex::new(Vec::new()));
        let sink = seen.clone();
        recognizer.queue(Arc::new(move |t: &Transition| sink.lock().push(*t)));
        seen
    }

    fn cursors(n: usize) -> Vec<Cursor> {
        (0..n).map(|i| Cursor::new(i as i64, 1, 1)).collect()
    }

    #[test]
    fn test_classify_table() {
        assert_eq!(Transition::classify(false, true, true), Transition::Arm);
        assert_eq!(Transition::classify(true, true, false), Transition::Perform);
        assert_eq!(Transition::classify(true, true, true), Transition::Rebase);
        assert_eq!(Transition::classify(true, false, true), Transition::Unarm);
        assert_eq!(Transition::classify(false, false, false), Transition::Idle);
    }

    #[test]
    fn test_full_lifecycle() {
        let recognizer = Recognizer::<Probe>::new();
        let seen = recorded(&recognizer);
        let target = TargetHandle::new(RectTarget::new("t", 0, 0, 10, 10));

        for n in [0, 1, 1, 2, 3, 3, 0] {
            recognizer.process(&CursorEvent::new(cursors(n)).for_target(target.clone()));
        }

        assert_eq!(
            *seen.lock(),
            vec![
                Transition::Arm,
                Transition::Perform,
                Transition::Rebase,
                Transition::Unarm,
            ]
        );
        assert!(!recognizer.is_armed(&target));
    }

    #[test]
    fn test_targets_are_independent() {
        let recognizer = Recognizer::<Probe>::new();
        let seen = recorded(&recognizer);
        let a = TargetHandle::new(RectTarget::new("a", 0, 0, 10, 10));
        let b = TargetHandle::new(RectTarget::new("b", 0, 0, 10, 10));

        recognizer.process(&CursorEvent::new(cursors(1)).for_target(a.clone()));
        recognizer.process(&CursorEvent::new(cursors(1)).for_target(b.clone()));
        assert_eq!(*seen.lock(), vec![Transition::Arm, Transition::Arm]);
        assert!(recognizer.is_armed(&a));
        assert!(recognizer.is_armed(&b));
        assert_eq!(recognizer.tracked_targets(), 2);
    }

    #[test]
    fn test_untargeted_events_are_ignored() {
        let recognizer = Recognizer::<Probe>::new();
        let seen = recorded(&recognizer);
        recognizer.process(&CursorEvent::new(cursors(1)));
        assert!(seen.lock().is_empty());
        assert_eq!(recognizer.tracked_targets(), 0);
    }

    #[test]
    fn test_release_and_prune() {
        let recognizer = Recognizer::<Probe>::new();
        let a = TargetHandle::new(RectTarget::new("a", 0, 0, 10, 10));
        let b = TargetHandle::new(RectTarget::new("b", 0, 0, 10, 10));

        recognizer.process(&CursorEvent::new(cursors(1)).for_target(a.clone()));
        recognizer.process(&CursorEvent::new(cursors(1)).for_target(b.clone()));

        assert!(recognizer.release_target(&a));
        assert!(!recognizer.release_target(&a));
        drop(b);
        assert_eq!(recognizer.prune_released(), 1);
        assert_eq!(recognizer.tracked_targets(), 0);
    }

    #[test]
    fn test_bounds_setters_validate() {
        let recognizer = Recognizer::<Probe>::new();
        assert!(recognizer.set_min_cursor_count(3).is_err());
        assert_eq!(recognizer.cursor_bounds(), CursorBounds { min: 1, max: 2 });
        assert!(recognizer.set_max_cursor_count(4).is_ok());
        assert!(recognizer.set_min_cursor_count(3).is_ok());
        assert_eq!(recognizer.cursor_bounds(), CursorBounds { min: 3, max: 4 });
        assert!(recognizer.set_cursor_bounds(CursorBounds { min: 5, max: 1 }).is_err());
    }
}
