//! Spring smoothing filter
//!
//! Each cursor is followed by a damped spring that is stepped toward the raw
//! position using the time elapsed between snapshots. Large jumps reset the
//! spring instead of letting it swing across the surface.

use crate::chain::{Chainable, Listener, Listeners, NodeKind};
use crate::config::SpringConfig;
use crate::error::GestureResult;
use crate::input::{Cursor, CursorEvent, CursorId};
use crate::target::TargetRegistry;
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashMap;
use std::time::Instant;

/// Longest single integration step, in seconds
const MAX_STEP_SECS: f64 = 1.0 / 120.0;

/// Gaps at least this long snap the spring to its target, in seconds
const SETTLE_SECS: f64 = 1.0;

/// 1D spring state tracking position and velocity
#[derive(Debug, Clone)]
pub struct SpringAxis {
    pub position: f64,
    pub velocity: f64,
}

impl SpringAxis {
    /// Spring at rest at `initial`.
    pub fn new(initial: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
        }
    }

    /// Damped harmonic oscillator: F = -k * x - c * v
    pub fn step(&mut self, target: f64, config: &SpringConfig, dt: f64) {
        let displacement = self.position - target;
        let acceleration =
            (-config.stiffness * displacement - config.damping * self.velocity) / config.mass;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }
}

/// Spring following one cursor in two dimensions
#[derive(Debug, Clone)]
pub struct Spring2D {
    pub x: SpringAxis,
    pub y: SpringAxis,
}

impl Spring2D {
    /// Spring at rest at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: SpringAxis::new(x),
            y: SpringAxis::new(y),
        }
    }

    /// Advance toward `(x, y)` by `elapsed` seconds in bounded sub-steps.
    ///
    /// Returns the number of sub-steps taken. A gap of [`SETTLE_SECS`] or more
    /// takes none: the spring is placed on the target at rest.
    pub fn advance(&mut self, x: f64, y: f64, config: &SpringConfig, elapsed: f64) -> usize {
        if !(elapsed < SETTLE_SECS) {
            self.reset(x, y);
            return 0;
        }
        let mut remaining = elapsed;
        let mut steps = 0;
        while remaining > 0.0 {
            let dt = remaining.min(MAX_STEP_SECS);
            self.x.step(x, config, dt);
            self.y.step(y, config, dt);
            remaining -= dt;
            steps += 1;
        }
        steps
    }

    /// Current smoothed position.
    pub fn position(&self) -> (f64, f64) {
        (self.x.position, self.y.position)
    }

    /// Jump to `(x, y)` and drop all velocity.
    pub fn reset(&mut self, x: f64, y: f64) {
        *self = Self::new(x, y);
    }
}

struct Tracked {
    spring: Spring2D,
    raw: (i32, i32),
    seen_at: Instant,
}

type TrackedCursors = HashMap<CursorId, Tracked>;

#[derive(Default)]
struct Springs {
    untargeted: TrackedCursors,
    targeted: TargetRegistry<TrackedCursors>,
}

/// Smooths cursor motion with per-cursor springs
pub struct SpringFilter {
    config: ParkingMutex<SpringConfig>,
    springs: ParkingMutex<Springs>,
    listeners: Listeners<CursorEvent>,
}

impl Default for SpringFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpringFilter {
    /// Filter with the default spring parameters.
    pub fn new() -> Self {
        Self {
            config: ParkingMutex::new(SpringConfig::default()),
            springs: ParkingMutex::new(Springs::default()),
            listeners: Listeners::new(),
        }
    }

    /// Filter with custom spring parameters.
    pub fn with_config(config: SpringConfig) -> GestureResult<Self> {
        let filter = Self::new();
        filter.set_config(config)?;
        Ok(filter)
    }

    /// Current spring parameters.
    pub fn config(&self) -> SpringConfig {
        self.config.lock().clone()
    }

    /// Replace the spring parameters after validating them.
    pub fn set_config(&self, config: SpringConfig) -> GestureResult<()> {
        config.validate()?;
        *self.config.lock() = config;
        Ok(())
    }

    fn smooth(&self, event: &CursorEvent) -> Vec<Cursor> {
        let config = self.config();
        let mut guard = self.springs.lock();
        let springs = &mut *guard;
        let slot = match &event.target {
            Some(target) => {
                springs.targeted.prune();
                springs.targeted.get_or_insert_with(target, HashMap::new)
            }
            None => &mut springs.untargeted,
        };

        let mut previous = std::mem::take(slot);
        let mut current = HashMap::with_capacity(event.cursors.len());

        let smoothed = event
            .cursors
            .iter()
            .map(|cursor| {
                let (rx, ry) = (cursor.x as f64, cursor.y as f64);
                let tracked = match previous.remove(&cursor.id) {
                    Some(mut tracked) => {
                        let dx = rx - tracked.raw.0 as f64;
                        let dy = ry - tracked.raw.1 as f64;
                        if (dx * dx + dy * dy).sqrt() > config.teleport_threshold {
                            tracked.spring.reset(rx, ry);
                        } else {
                            let elapsed = event
                                .timestamp
                                .saturating_duration_since(tracked.seen_at)
                                .as_secs_f64();
                            tracked.spring.advance(rx, ry, &config, elapsed);
                        }
                        Tracked {
                            spring: tracked.spring,
                            raw: (cursor.x, cursor.y),
                            seen_at: event.timestamp,
                        }
                    }
                    None => Tracked {
                        spring: Spring2D::new(rx, ry),
                        raw: (cursor.x, cursor.y),
                        seen_at: event.timestamp,
                    },
                };
                let (sx, sy) = tracked.spring.position();
                current.insert(cursor.id, tracked);
                cursor.moved_to(sx.round() as i32, sy.round() as i32)
            })
            .collect();

        *slot = current;
        smoothed
    }
}

impl Listener<CursorEvent> for SpringFilter {
    fn process(&self, event: &CursorEvent) {
        let smoothed = self.smooth(event);
        self.listeners.emit(&event.with_cursors(smoothed));
    }
}

impl Chainable<CursorEvent> for SpringFilter {
    fn kind(&self) -> NodeKind {
        NodeKind::Filter
    }

    fn listeners(&self) -> &Listeners<CursorEvent> {
        &self.listeners
    }
}
