//! Touch targets
//!
//! A target is anything that can say whether a cursor landed on it. Targets are
//! compared by identity: two handles are equal only if they point at the same
//! target instance.

pub mod registry;

pub use registry::TargetRegistry;

use crate::input::Cursor;
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Upcast helper so handles can hand back the application's own object.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A hit-testable region that can own cursors
pub trait Target: AsAny + Send + Sync {
    /// Whether the cursor lies on this target.
    fn is_touched(&self, cursor: &Cursor) -> bool;

    fn max_width(&self) -> i32;

    fn max_height(&self) -> i32;

    /// Human readable name used in logs.
    fn name(&self) -> &str {
        "target"
    }
}

/// Identity of a target allocation, stable while any handle to it exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

/// Shared handle to a target
#[derive(Clone)]
pub struct TargetHandle(Arc<dyn Target>);

impl TargetHandle {
    /// Wraps an application target in a shared handle.
    pub fn new<T: Target + 'static>(target: T) -> Self {
        Self(Arc::new(target))
    }

    /// Wraps a target the application already shares.
    pub fn from_arc(target: Arc<dyn Target>) -> Self {
        Self(target)
    }

    /// Identity of the underlying allocation.
    pub fn id(&self) -> TargetId {
        TargetId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    /// Non-owning reference to the same target.
    pub fn downgrade(&self) -> WeakTarget {
        WeakTarget {
            id: self.id(),
            inner: Arc::downgrade(&self.0),
        }
    }

    /// Recover the concrete target the application registered.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Target as AsAny>::as_any(&*self.0).downcast_ref::<T>()
    }

    /// Hit test against the wrapped target.
    pub fn is_touched(&self, cursor: &Cursor) -> bool {
        self.0.is_touched(cursor)
    }

    pub fn max_width(&self) -> i32 {
        self.0.max_width()
    }

    pub fn max_height(&self) -> i32 {
        self.0.max_height()
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl PartialEq for TargetHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for TargetHandle {}

impl Hash for TargetHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetHandle({}@{:#x})", self.name(), self.id().0)
    }
}

/// Non-owning reference to a target
///
/// Holding a `WeakTarget` never keeps the target alive, but it does keep the
/// allocation reserved, so its `TargetId` cannot be reused while it exists.
#[derive(Clone)]
pub struct WeakTarget {
    id: TargetId,
    inner: Weak<dyn Target>,
}

impl WeakTarget {
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Handle to the target, if it still exists.
    pub fn upgrade(&self) -> Option<TargetHandle> {
        self.inner.upgrade().map(TargetHandle)
    }

    /// Whether the target has not been dropped yet.
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for WeakTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakTarget({:#x}, alive={})", self.id.0, self.is_alive())
    }
}

/// The whole touch surface
#[derive(Debug, Clone)]
pub struct ScreenTarget {
    pub width: i32,
    pub height: i32,
}

impl ScreenTarget {
    /// Whole-surface target of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Target for ScreenTarget {
    fn is_touched(&self, _cursor: &Cursor) -> bool {
        true
    }

    fn max_width(&self) -> i32 {
        self.width
    }

    fn max_height(&self) -> i32 {
        self.height
    }

    fn name(&self) -> &str {
        "screen"
    }
}

/// Axis-aligned rectangle, left/top inclusive and right/bottom exclusive
#[derive(Debug, Clone)]
pub struct RectTarget {
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RectTarget {
    /// Rectangle with its top-left corner at `(x, y)`.
    pub fn new(label: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            width,
            height,
        }
    }
}

impl Target for RectTarget {
    fn is_touched(&self, cursor: &Cursor) -> bool {
        let (x, y) = (cursor.x as i64, cursor.y as i64);
        let (left, top) = (self.x as i64, self.y as i64);
        x >= left
            && x < left + self.width as i64
            && y >= top
            && y < top + self.height as i64
    }

    fn max_width(&self) -> i32 {
        self.width
    }

    fn max_height(&self) -> i32 {
        self.height
    }

    fn name(&self) -> &str {
        &self.label
    }
}
