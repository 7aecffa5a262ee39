//! Pinch/spread gesture
//!
//! Tracks the mean distance of the cursors to their mean point. `ds` is the
//! ratio to the previous sample, `ds_total` the ratio to the distance when the
//! gesture armed.

use super::recognizer::{GestureModel, Recognizer, Sample};
use super::{CursorBounds, GestureState};
use crate::input::mean_radius;
use crate::target::TargetHandle;

/// Distances at or below this are treated as all cursors sitting on one point.
const DEGENERATE_DISTANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct PinchSpreadEvent {
    pub state: GestureState,
    pub target: TargetHandle,
    pub ds: f64,
    pub ds_total: f64,
    /// Mean cursor position
    pub center: (f64, f64),
    pub cursor_count: usize,
}

#[derive(Debug)]
pub struct PinchSpreadContext {
    reference: f64,
    previous: f64,
    center: (f64, f64),
}

impl Default for PinchSpreadContext {
    fn default() -> Self {
        Self {
            reference: 1.0,
            previous: 1.0,
            center: (0.0, 0.0),
        }
    }
}

#[derive(Debug, Default)]
pub struct PinchSpreadGesture;

pub type PinchSpreadRecognizer = Recognizer<PinchSpreadGesture>;

impl GestureModel for PinchSpreadGesture {
    type Context = PinchSpreadContext;
    type Event = PinchSpreadEvent;

    const NAME: &'static str = "pinch-spread";

    fn default_bounds(&self) -> CursorBounds {
        CursorBounds::at_least(2)
    }

    fn arm(
        &self,
        context: &mut PinchSpreadContext,
        sample: &Sample<'_>,
    ) -> Option<PinchSpreadEvent> {
        let center = sample.event.mean_point()?;
        let mut distance = mean_radius(&sample.event.cursors)?;
        if distance <= DEGENERATE_DISTANCE {
            distance = 1.0;
        }
        context.reference = distance;
        context.previous = distance;
        context.center = center;
        Some(PinchSpreadEvent {
            state: GestureState::Armed,
            target: sample.target.clone(),
            ds: 1.0,
            ds_total: 1.0,
            center,
            cursor_count: sample.count(),
        })
    }

    fn perform(
        &self,
        context: &mut PinchSpreadContext,
        sample: &Sample<'_>,
    ) -> Option<PinchSpreadEvent> {
        let center = sample.event.mean_point()?;
        let distance = mean_radius(&sample.event.cursors)?;
        context.center = center;
        if distance <= DEGENERATE_DISTANCE {
            return None;
        }
        let ds = distance / context.previous;
        context.previous = distance;
        Some(PinchSpreadEvent {
            state: GestureState::Performed,
            target: sample.target.clone(),
            ds,
            ds_total: distance / context.reference,
            center,
            cursor_count: sample.count(),
        })
    }

    fn rebase(
        &self,
        context: &mut PinchSpreadContext,
        sample: &Sample<'_>,
    ) -> Option<PinchSpreadEvent> {
        let center = sample.event.mean_point()?;
        let distance = mean_radius(&sample.event.cursors)?;
        context.center = center;
        if distance > DEGENERATE_DISTANCE {
            context.reference *= distance / context.previous;
            context.previous = distance;
        }
        None
    }

    fn unarm(
        &self,
        context: &mut PinchSpreadContext,
        sample: &Sample<'_>,
        out: &mut Vec<PinchSpreadEvent>,
    ) {
        out.push(PinchSpreadEvent {
            state: GestureState::Unarmed,
            target: sample.target.clone(),
            ds: 1.0,
            ds_total: context.previous / context.reference,
            center: context.center,
            cursor_count: sample.previous_count,
        });
        *context = PinchSpreadContext::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Chainable, Listener};
    use crate::input::{Cursor, CursorEvent};
    use crate::target::RectTarget;
    use parking_lot::Mutex as ParkingMutex;
    use std::sync::Arc;

    type Seen = Arc<ParkingMutex<Vec<PinchSpreadEvent>>>;

    fn setup() -> (PinchSpreadRecognizer, TargetHandle, Seen) {
        let recognizer = PinchSpreadRecognizer::new();
        let seen = Arc::new(ParkingMutex::new(Vec::new()));
        let sink = seen.clone();
        recognizer.queue(Arc::new(move |e: &PinchSpreadEvent| {
            sink.lock().push(e.clone())
        }));
        let target = TargetHandle::new(RectTarget::new("t", 0, 0, 1000, 1000));
        (recognizer, target, seen)
    }

    fn feed(recognizer: &PinchSpreadRecognizer, target: &TargetHandle, cursors: &[Cursor]) {
        recognizer.process(&CursorEvent::new(cursors.to_vec()).for_target(target.clone()));
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_cursor_does_not_arm() {
        let (recognizer, target, seen) = setup();
        feed(&recognizer, &target, &[Cursor::new(1, 100, 100)]);
        assert!(seen.lock().is_empty());
        assert_eq!(recognizer.cursor_bounds().min, 2);
    }

    #[test]
    fn test_spread_doubles_scale() {
        let (recognizer, target, seen) = setup();
        feed(&recognizer, &target, &[Cursor::new(1, 90, 100), Cursor::new(2, 110, 100)]);
        feed(&recognizer, &target, &[Cursor::new(1, 80, 100), Cursor::new(2, 120, 100)]);
        feed(&recognizer, &target, &[Cursor::new(1, 60, 100), Cursor::new(2, 140, 100)]);
        feed(&recognizer, &target, &[]);

        let seen = seen.lock();
        assert_eq!(seen[0].state, GestureState::Armed);
        assert!(approx(seen[1].ds, 2.0));
        assert!(approx(seen[1].ds_total, 2.0));
        assert!(approx(seen[2].ds, 2.0));
        assert!(approx(seen[2].ds_total, 4.0));
        assert_eq!(seen[3].state, GestureState::Unarmed);
        assert!(approx(seen[3].ds_total, 4.0));
        assert_eq!(seen[3].cursor_count, 2);
    }

    #[test]
    fn test_pinch_shrinks_scale() {
        let (recognizer, target, seen) = setup();
        feed(&recognizer, &target, &[Cursor::new(1, 0, 0), Cursor::new(2, 100, 0)]);
        feed(&recognizer, &target, &[Cursor::new(1, 25, 0), Cursor::new(2, 75, 0)]);

        let last = seen.lock().last().cloned().unwrap();
        assert!(approx(last.ds, 0.5));
        assert!(approx(last.ds_total, 0.5));
        assert_eq!(last.center, (50.0, 0.0));
    }

    #[test]
    fn test_rebase_keeps_total_continuous() {
        let (recognizer, target, seen) = setup();
        feed(&recognizer, &target, &[Cursor::new(1, 90, 100), Cursor::new(2, 110, 100)]);
        feed(&recognizer, &target, &[Cursor::new(1, 80, 100), Cursor::new(2, 120, 100)]);
        // A third finger lands: mean radius changes without any real spread.
        feed(
            &recognizer,
            &target,
            &[Cursor::new(1, 80, 100), Cursor::new(2, 120, 100), Cursor::new(3, 100, 400)],
        );
        let before = seen.lock().last().cloned().unwrap();
        assert_eq!(seen.lock().len(), 2, "rebase must not emit");

        // Then the third finger lifts again.
        feed(&recognizer, &target, &[Cursor::new(1, 80, 100), Cursor::new(2, 120, 100)]);
        feed(&recognizer, &target, &[Cursor::new(1, 80, 100), Cursor::new(2, 120, 100)]);

        let after = seen.lock().last().cloned().unwrap();
        assert_eq!(after.state, GestureState::Performed);
        assert!(approx(after.ds, 1.0));
        assert!(approx(after.ds_total, before.ds_total));
    }

    #[test]
    fn test_degenerate_arm_uses_unit_distance() {
        let (recognizer, target, seen) = setup();
        feed(&recognizer, &target, &[Cursor::new(1, 50, 50), Cursor::new(2, 50, 50)]);
        feed(&recognizer, &target, &[Cursor::new(1, 50, 50), Cursor::new(2, 50, 50)]);
        feed(&recognizer, &target, &[Cursor::new(1, 49, 50), Cursor::new(2, 51, 50)]);

        let seen = seen.lock();
        assert_eq!(seen.len(), 2, "degenerate perform is skipped");
        assert!(seen.iter().all(|e| e.ds.is_finite() && e.ds_total.is_finite()));
        assert!(approx(seen[1].ds_total, 1.0));
    }
}
