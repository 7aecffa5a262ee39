//! Touch input data
//!
//! Cursors are immutable contact points; a `CursorEvent` carries one complete
//! snapshot of them through the chain.

pub mod types;

pub use types::{mean_point, mean_radius, Cursor, CursorEvent, CursorId, UserId};
