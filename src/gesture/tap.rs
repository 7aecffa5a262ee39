//! Tap gesture
//!
//! A tap arms when enough cursors land on the target and completes when they
//! lift. Taps landing within the consecutive-tap timeout of the previous one
//! count up (double tap, triple tap, ...). Sliding every cursor off the target
//! cancels the tap: it unarms without performing, and the target stays
//! disarmed until all cursors have lifted.

use super::recognizer::{GestureModel, Recognizer, Sample};
use super::{CursorBounds, GestureState};
use crate::config::{TapConfig, DEFAULT_CONSECUTIVE_TAP_TIMEOUT_MS};
use crate::error::{GestureError, GestureResult};
use crate::target::TargetHandle;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TapEvent {
    pub state: GestureState,
    pub target: TargetHandle,
    /// 1 for a single tap, 2 for a double tap, ...
    pub tap_count: u32,
    /// Most cursors seen at once during the tap
    pub cursor_count: usize,
    /// Mean cursor position at the last valid sample
    pub position: (f64, f64),
}

#[derive(Debug, Default)]
pub struct TapContext {
    pending_count: u32,
    tap_count: u32,
    last_tap: Option<Instant>,
    cancelled: bool,
    max_cursors: usize,
    position: (f64, f64),
}

#[derive(Debug)]
pub struct TapGesture {
    consecutive_tap_timeout: Duration,
}

impl Default for TapGesture {
    fn default() -> Self {
        Self {
            consecutive_tap_timeout: Duration::from_millis(DEFAULT_CONSECUTIVE_TAP_TIMEOUT_MS),
        }
    }
}

pub type TapRecognizer = Recognizer<TapGesture>;

impl TapGesture {
    fn event(&self, state: GestureState, context: &TapContext, sample: &Sample<'_>) -> TapEvent {
        TapEvent {
            state,
            target: sample.target.clone(),
            tap_count: context.pending_count,
            cursor_count: context.max_cursors,
            position: context.position,
        }
    }

    fn track(&self, context: &mut TapContext, sample: &Sample<'_>) {
        context.max_cursors = context.max_cursors.max(sample.count());
        if let Some(position) = sample.event.mean_point() {
            context.position = position;
        }
    }
}

impl GestureModel for TapGesture {
    type Context = TapContext;
    type Event = TapEvent;

    const NAME: &'static str = "tap";

    fn default_bounds(&self) -> CursorBounds {
        CursorBounds::at_least(1)
    }

    fn accepts(&self, context: &TapContext, sample: &Sample<'_>) -> bool {
        !context.cancelled
            && sample
                .event
                .cursors
                .iter()
                .any(|cursor| sample.target.is_touched(cursor))
    }

    fn arm(&self, context: &mut TapContext, sample: &Sample<'_>) -> Option<TapEvent> {
        let timestamp = sample.event.timestamp;
        let consecutive = context.last_tap.map_or(false, |last| {
            timestamp.saturating_duration_since(last) <= self.consecutive_tap_timeout
        });
        context.pending_count = if consecutive { context.tap_count + 1 } else { 1 };
        context.max_cursors = 0;
        self.track(context, sample);
        Some(self.event(GestureState::Armed, context, sample))
    }

    fn perform(&self, context: &mut TapContext, sample: &Sample<'_>) -> Option<TapEvent> {
        self.track(context, sample);
        None
    }

    fn rebase(&self, context: &mut TapContext, sample: &Sample<'_>) -> Option<TapEvent> {
        self.track(context, sample);
        None
    }

    fn unarm(&self, context: &mut TapContext, sample: &Sample<'_>, out: &mut Vec<TapEvent>) {
        let cursors = &sample.event.cursors;
        let left_target = !cursors.is_empty() && !cursors.iter().any(|c| sample.target.is_touched(c));
        let too_many = cursors.len() > sample.previous_count && cursors.len() > context.max_cursors;

        if left_target || too_many {
            out.push(self.event(GestureState::Unarmed, context, sample));
            context.cancelled = true;
        } else {
            context.tap_count = context.pending_count;
            context.last_tap = Some(sample.event.timestamp);
            out.push(self.event(GestureState::Performed, context, sample));
            out.push(self.event(GestureState::Unarmed, context, sample));
        }
        context.pending_count = 0;
        context.max_cursors = 0;
    }

    fn idle(&self, context: &mut TapContext, sample: &Sample<'_>) {
        if sample.event.is_empty() {
            context.cancelled = false;
        }
    }
}

impl Recognizer<TapGesture> {
    /// Tap recognizer configured from the `tap` config section.
    pub fn from_config(config: &TapConfig) -> GestureResult<Self> {
        let recognizer = Self::with_bounds(config.bounds)?;
        recognizer.set_consecutive_tap_timeout(Duration::from_millis(
            config.consecutive_tap_timeout_ms,
        ))?;
        Ok(recognizer)
    }

    /// Longest gap between a lift and the next press that still counts up.
    pub fn consecutive_tap_timeout(&self) -> Duration {
        self.with_model_mut(|model| model.consecutive_tap_timeout)
    }

    /// Change the consecutive tap window. Zero is rejected.
    pub fn set_consecutive_tap_timeout(&self, timeout: Duration) -> GestureResult<()> {
        if timeout.is_zero() {
            return Err(GestureError::InvalidTimeout);
        }
        self.with_model_mut(|model| model.consecutive_tap_timeout = timeout);
        Ok(())
    }
}
