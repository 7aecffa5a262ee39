//! Gesture recognition
//!
//! Recognizers consume the per-target cursor sets produced by the dispatcher
//! and turn them into arm/perform/unarm lifecycles. The transition table lives
//! in [`recognizer`]; each gesture only supplies what happens on each edge.

pub mod drag;
pub mod pinch;
pub mod recognizer;
pub mod tap;

pub use drag::{DragEvent, DragGesture, DragRecognizer};
pub use pinch::{PinchSpreadEvent, PinchSpreadGesture, PinchSpreadRecognizer};
pub use recognizer::{GestureModel, Recognizer, Sample, Transition};
pub use tap::{TapEvent, TapGesture, TapRecognizer};

use crate::error::{GestureError, GestureResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase carried by every gesture event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureState {
    Armed,
    Performed,
    Unarmed,
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureState::Armed => write!(f, "armed"),
            GestureState::Performed => write!(f, "performed"),
            GestureState::Unarmed => write!(f, "unarmed"),
        }
    }
}

/// Inclusive range of simultaneous cursors a gesture requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorBounds {
    pub min: usize,
    pub max: usize,
}

impl CursorBounds {
    /// Validated bounds from `min` to `max` inclusive.
    pub fn new(min: usize, max: usize) -> GestureResult<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// `min` or more cursors, no upper limit.
    pub const fn at_least(min: usize) -> Self {
        Self {
            min,
            max: usize::MAX,
        }
    }

    /// Whether `count` cursors satisfy the bounds.
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }

    /// Zero is never a valid minimum: an empty set must always end a gesture.
    pub fn validate(&self) -> GestureResult<()> {
        if self.min == 0 || self.min > self.max {
            return Err(GestureError::InvalidCursorBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}
