//! Dead-zone jitter filter
//!
//! Each cursor keeps a filtered position. A raw position inside the square of
//! half-width `dead_zone` around it is ignored; a position outside drags the
//! filtered position along so it trails the raw one by exactly `dead_zone` on
//! every axis it exited.

use crate::chain::{Chainable, Listener, Listeners, NodeKind};
use crate::error::{GestureError, GestureResult};
use crate::input::{Cursor, CursorEvent, CursorId};
use crate::target::TargetRegistry;
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashMap;

pub const DEFAULT_DEAD_ZONE: i32 = 10;

pub struct BoundingBoxFilter {
    dead_zone: ParkingMutex<i32>,
    positions: ParkingMutex<Positions>,
    listeners: Listeners<CursorEvent>,
}

type FilteredPositions = HashMap<CursorId, (i32, i32)>;

#[derive(Default)]
struct Positions {
    untargeted: FilteredPositions,
    targeted: TargetRegistry<FilteredPositions>,
}

impl Default for BoundingBoxFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBoxFilter {
    /// Filter with the default dead zone.
    pub fn new() -> Self {
        Self {
            dead_zone: ParkingMutex::new(DEFAULT_DEAD_ZONE),
            positions: ParkingMutex::new(Positions::default()),
            listeners: Listeners::new(),
        }
    }

    /// Filter with a custom dead zone half-width.
    pub fn with_dead_zone(dead_zone: i32) -> GestureResult<Self> {
        let filter = Self::new();
        filter.set_dead_zone(dead_zone)?;
        Ok(filter)
    }

    /// Current dead zone half-width.
    pub fn dead_zone(&self) -> i32 {
        *self.dead_zone.lock()
    }

    /// Change the dead zone half-width. Must be positive.
    pub fn set_dead_zone(&self, dead_zone: i32) -> GestureResult<()> {
        if dead_zone <= 0 {
            return Err(GestureError::InvalidDeadZone(dead_zone));
        }
        *self.dead_zone.lock() = dead_zone;
        Ok(())
    }

    fn filter(&self, event: &CursorEvent) -> Vec<Cursor> {
        let dead_zone = self.dead_zone();
        let mut guard = self.positions.lock();
        let positions = &mut *guard;
        let slot = match &event.target {
            Some(target) => {
                positions.targeted.prune();
                positions.targeted.get_or_insert_with(target, HashMap::new)
            }
            None => &mut positions.untargeted,
        };

        let previous = std::mem::take(slot);
        let mut current = HashMap::with_capacity(event.cursors.len());

        let filtered = event
            .cursors
            .iter()
            .map(|cursor| {
                let (x, y) = match previous.get(&cursor.id) {
                    Some(&(fx, fy)) => (
                        trail(fx, cursor.x, dead_zone),
                        trail(fy, cursor.y, dead_zone),
                    ),
                    None => (cursor.x, cursor.y),
                };
                current.insert(cursor.id, (x, y));
                cursor.moved_to(x, y)
            })
            .collect();

        // Ids missing from this snapshot are forgotten so a reused id starts fresh.
        *slot = current;
        filtered
    }
}

/// Offsets are computed in `i64` so coordinates at the ends of the `i32`
/// range cannot overflow.
fn trail(filtered: i32, raw: i32, dead_zone: i32) -> i32 {
    let (filtered, raw, dead_zone) = (filtered as i64, raw as i64, dead_zone as i64);
    let offset = raw - filtered;
    let trailed = if offset > dead_zone {
        raw - dead_zone
    } else if offset < -dead_zone {
        raw + dead_zone
    } else {
        filtered
    };
    trailed.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl Listener<CursorEvent> for BoundingBoxFilter {
    fn process(&self, event: &CursorEvent) {
        let filtered = self.filter(event);
        self.listeners.emit(&event.with_cursors(filtered));
    }
}

impl Chainable<CursorEvent> for BoundingBoxFilter {
    fn kind(&self) -> NodeKind {
        NodeKind::Filter
    }

    fn listeners(&self) -> &Listeners<CursorEvent> {
        &self.listeners
    }
}
