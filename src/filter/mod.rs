//! Cursor stream filters
//!
//! Denoising nodes rewrite cursor positions, gating nodes decide whether an
//! event travels further. All of them forward empty cursor sets: an empty set
//! is how "every finger lifted" is signalled.

pub mod bounding_box;
pub mod gate;
pub mod no_change;
pub mod spring;

pub use bounding_box::{BoundingBoxFilter, DEFAULT_DEAD_ZONE};
pub use gate::{GateMode, TargetFilter, UserFilter};
pub use no_change::NoChangeFilter;
pub use spring::{Spring2D, SpringAxis, SpringFilter};
