//! Touch Gestures - per-target gesture recognition for multi-touch input.
//!
//! Raw cursor sets flow through a chain of nodes built by the application:
//! filters denoise and gate them, the [`dispatch::Dispatcher`] splits them per
//! touched target, and recognizers turn each target's cursor set into drag,
//! pinch/spread and tap gestures.
//!
//! ```text
//! input -> SchedulerBoundary -> filters -> Dispatcher -> recognizers -> application
//! ```

pub mod chain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod gesture;
pub mod input;
pub mod replay;
pub mod scheduler;
pub mod target;

pub use chain::{connect, Chainable, Listener, Listeners, NodeKind};
pub use config::GestureConfig;
pub use dispatch::Dispatcher;
pub use error::{GestureError, GestureResult};
pub use gesture::{
    CursorBounds, DragEvent, DragRecognizer, GestureState, PinchSpreadEvent,
    PinchSpreadRecognizer, TapEvent, TapRecognizer,
};
pub use input::{Cursor, CursorEvent, CursorId, UserId};
pub use target::{RectTarget, ScreenTarget, Target, TargetHandle};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing if the application already installed one.
pub fn init_tracing() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "touch_gestures=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("Touch gestures v{}", env!("CARGO_PKG_VERSION"));
    }
}
