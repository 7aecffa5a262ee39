//! Drag gesture
//!
//! Tracks the mean position of all cursors on a target. Deltas are reported
//! per step and in total since the gesture armed; adding or lifting fingers
//! mid-drag shifts the reference point so the total stays continuous.

use super::recognizer::{GestureModel, Recognizer, Sample};
use super::{CursorBounds, GestureState};
use crate::target::TargetHandle;

#[derive(Debug, Clone)]
pub struct DragEvent {
    pub state: GestureState,
    pub target: TargetHandle,
    pub dx: f64,
    pub dy: f64,
    pub dx_total: f64,
    pub dy_total: f64,
    /// Mean cursor position
    pub center: (f64, f64),
    pub cursor_count: usize,
}

#[derive(Debug, Default)]
pub struct DragContext {
    reference: (f64, f64),
    previous: (f64, f64),
}

impl DragContext {
    fn totals(&self) -> (f64, f64) {
        (
            self.previous.0 - self.reference.0,
            self.previous.1 - self.reference.1,
        )
    }
}

#[derive(Debug, Default)]
pub struct DragGesture;

pub type DragRecognizer = Recognizer<DragGesture>;

impl GestureModel for DragGesture {
    type Context = DragContext;
    type Event = DragEvent;

    const NAME: &'static str = "drag";

    fn default_bounds(&self) -> CursorBounds {
        CursorBounds::at_least(1)
    }

    fn arm(&self, context: &mut DragContext, sample: &Sample<'_>) -> Option<DragEvent> {
        let center = sample.event.mean_point()?;
        context.reference = center;
        context.previous = center;
        Some(DragEvent {
            state: GestureState::Armed,
            target: sample.target.clone(),
            dx: 0.0,
            dy: 0.0,
            dx_total: 0.0,
            dy_total: 0.0,
            center,
            cursor_count: sample.count(),
        })
    }

    fn perform(&self, context: &mut DragContext, sample: &Sample<'_>) -> Option<DragEvent> {
        let center = sample.event.mean_point()?;
        let dx = center.0 - context.previous.0;
        let dy = center.1 - context.previous.1;
        context.previous = center;
        let (dx_total, dy_total) = context.totals();
        Some(DragEvent {
            state: GestureState::Performed,
            target: sample.target.clone(),
            dx,
            dy,
            dx_total,
            dy_total,
            center,
            cursor_count: sample.count(),
        })
    }

    fn rebase(&self, context: &mut DragContext, sample: &Sample<'_>) -> Option<DragEvent> {
        let center = sample.event.mean_point()?;
        context.reference.0 += center.0 - context.previous.0;
        context.reference.1 += center.1 - context.previous.1;
        context.previous = center;
        None
    }

    fn unarm(&self, context: &mut DragContext, sample: &Sample<'_>, out: &mut Vec<DragEvent>) {
        let (dx_total, dy_total) = context.totals();
        out.push(DragEvent {
            state: GestureState::Unarmed,
            target: sample.target.clone(),
            dx: 0.0,
            dy: 0.0,
            dx_total,
            dy_total,
            center: context.previous,
            cursor_count: sample.previous_count,
        });
        *context = DragContext::default();
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

    fn setup() -> (DragRecognizer, TargetHandle, Arc<ParkingMutex<Vec<DragEvent>>>) {
        let recognizer = DragRecognizer::new();
        let seen = Arc::new(ParkingMutex::new(Vec::new()));
        let sink = seen.clone();
        recognizer.queue(Arc::new(move |e: &DragEvent| sink.lock().push(e.clone())));
        let target = TargetHandle::new(RectTarget::new("t", 0, 0, 100, 100));
        (recognizer, target, seen)
    }

    fn feed(recognizer: &DragRecognizer, target: &TargetHandle, cursors: &[Cursor]) {
        recognizer.process(&CursorEvent::new(cursors.to_vec()).for_target(target.clone()));
    }

    #[test]
    fn test_single_finger_drag_scenario() {
        let (recognizer, target, seen) = setup();
        feed(&recognizer, &target, &[Cursor::new(1, 50, 50)]);
        feed(&recognizer, &target, &[Cursor::new(1, 60, 50)]);
        feed(&recognizer, &target, &[]);

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);

        assert_eq!(seen[0].state, GestureState::Armed);
        assert_eq!((seen[0].dx, seen[0].dy), (0.0, 0.0));
        assert_eq!((seen[0].dx_total, seen[0].dy_total), (0.0, 0.0));

        assert_eq!(seen[1].state, GestureState::Performed);
        assert_eq!((seen[1].dx, seen[1].dy), (10.0, 0.0));
        assert_eq!((seen[1].dx_total, seen[1].dy_total), (10.0, 0.0));

        assert_eq!(seen[2].state, GestureState::Unarmed);
        assert_eq!((seen[2].dx_total, seen[2].dy_total), (10.0, 0.0));
        assert_eq!(seen[2].target, target);
    }

    #[test]
    fn test_step_deltas_sum_to_total() {
        let (recognizer, target, seen) = setup();
        for (x, y) in [(10, 10), (13, 9), (20, 30), (18, 31), (40, 40)] {
            feed(&recognizer, &target, &[Cursor::new(1, x, y)]);
        }

        let seen = seen.lock();
        let (sx, sy) = seen
            .iter()
            .fold((0.0, 0.0), |(sx, sy), e| (sx + e.dx, sy + e.dy));
        let last = seen.last().unwrap();
        assert_eq!((sx, sy), (last.dx_total, last.dy_total));
        assert_eq!((last.dx_total, last.dy_total), (30.0, 30.0));
    }

    #[test]
    fn test_rebase_keeps_total_continuous() {
        // Same net finger movement, with and without a second finger joining.
        let (plain, target, plain_seen) = setup();
        feed(&plain, &target, &[Cursor::new(1, 10, 10)]);
        feed(&plain, &target, &[Cursor::new(1, 20, 10)]);
        feed(&plain, &target, &[Cursor::new(1, 30, 15)]);

        let (rebased, target, rebased_seen) = setup();
        feed(&rebased, &target, &[Cursor::new(1, 10, 10)]);
        feed(&rebased, &target, &[Cursor::new(1, 20, 10)]);
        feed(&rebased, &target, &[Cursor::new(1, 20, 10), Cursor::new(2, 80, 80)]);
        feed(&rebased, &target, &[Cursor::new(1, 30, 15), Cursor::new(2, 90, 85)]);

        let plain_last = plain_seen.lock().last().cloned().unwrap();
        let rebased_last = rebased_seen.lock().last().cloned().unwrap();
        assert_eq!(rebased_last.state, GestureState::Performed);
        assert_eq!(
            (plain_last.dx_total, plain_last.dy_total),
            (rebased_last.dx_total, rebased_last.dy_total)
        );
        // The rebase itself emits nothing.
        assert_eq!(rebased_seen.lock().len(), 3);
    }

    #[test]
    fn test_max_cursor_count_unarms() {
        let (recognizer, target, seen) = setup();
        recognizer.set_max_cursor_count(1).unwrap();
        feed(&recognizer, &target, &[Cursor::new(1, 10, 10)]);
        feed(&recognizer, &target, &[Cursor::new(1, 10, 10), Cursor::new(2, 20, 20)]);

        let states: Vec<_> = seen.lock().iter().map(|e| e.state).collect();
        assert_eq!(states, vec![GestureState::Armed, GestureState::Unarmed]);
        assert_eq!(seen.lock()[1].cursor_count, 1);
    }

    #[test]
    fn test_exactly_one_unarm_per_lift() {
        let (recognizer, target, seen) = setup();
        feed(&recognizer, &target, &[Cursor::new(1, 10, 10)]);
        feed(&recognizer, &target, &[]);
        feed(&recognizer, &target, &[]);
        feed(&recognizer, &target, &[]);

        let unarmed = seen
            .lock()
            .iter()
            .filter(|e| e.state == GestureState::Unarmed)
            .count();
        assert_eq!(unarmed, 1);
    }
}
