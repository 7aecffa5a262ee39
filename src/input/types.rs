use crate::target::TargetHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Identifier of a touch contact. Unique among simultaneously present cursors only.
pub type CursorId = i64;

/// Identifier of the user (or input source) a cursor set belongs to.
pub type UserId = u32;

/// One touch contact point at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub id: CursorId,
    pub x: i32,
    pub y: i32,
}

impl Cursor {
    /// Creates a cursor at `(x, y)`.
    pub const fn new(id: CursorId, x: i32, y: i32) -> Self {
        Self { id, x, y }
    }

    /// Same contact, new position.
    pub const fn moved_to(self, x: i32, y: i32) -> Self {
        Self { id: self.id, x, y }
    }
}

/// A complete snapshot of cursors, optionally addressed to a target
///
/// Before dispatch `target` is `None`. The dispatcher emits one event per
/// affected target; an empty `cursors` list on a targeted event means every
/// finger was lifted from that target.
#[derive(Debug, Clone)]
pub struct CursorEvent {
    pub cursors: Vec<Cursor>,
    pub target: Option<TargetHandle>,
    pub user: Option<UserId>,
    pub timestamp: Instant,
}

impl CursorEvent {
    /// Untargeted snapshot stamped with the current time.
    pub fn new(cursors: Vec<Cursor>) -> Self {
        Self {
            cursors,
            target: None,
            user: None,
            timestamp: Instant::now(),
        }
    }

    /// Tag the snapshot with the user that produced it.
    pub fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    /// Override the capture time.
    pub fn with_timestamp(mut self, timestamp: Instant) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Address the snapshot to `target`.
    pub fn for_target(mut self, target: TargetHandle) -> Self {
        self.target = Some(target);
        self
    }

    /// Copy of this event carrying a different cursor list.
    pub fn with_cursors(&self, cursors: Vec<Cursor>) -> Self {
        Self {
            cursors,
            target: self.target.clone(),
            user: self.user,
            timestamp: self.timestamp,
        }
    }

    /// Whether every finger has lifted.
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// Value equality of the cursor sets, ignoring order.
    pub fn same_cursors(&self, other: &[Cursor]) -> bool {
        if self.cursors.len() != other.len() {
            return false;
        }
        let mine: HashSet<&Cursor> = self.cursors.iter().collect();
        other.iter().all(|c| mine.contains(c))
    }

    /// Arithmetic mean of all cursor positions.
    pub fn mean_point(&self) -> Option<(f64, f64)> {
        mean_point(&self.cursors)
    }
}

/// Arithmetic mean of the cursor positions, `None` for an empty slice.
pub fn mean_point(cursors: &[Cursor]) -> Option<(f64, f64)> {
    if cursors.is_empty() {
        return None;
    }
    let n = cursors.len() as f64;
    let (sx, sy) = cursors.iter().fold((0.0, 0.0), |(sx, sy), c| {
        (sx + c.x as f64, sy + c.y as f64)
    });
    Some((sx / n, sy / n))
}

/// Mean Euclidean distance of the cursors to their mean point.
pub fn mean_radius(cursors: &[Cursor]) -> Option<f64> {
    let (mx, my) = mean_point(cursors)?;
    let total: f64 = cursors
        .iter()
        .map(|c| {
            let dx = c.x as f64 - mx;
            let dy = c.y as f64 - my;
            (dx * dx + dy * dy).sqrt()
        })
        .sum();
    Some(total / cursors.len() as f64)
}
