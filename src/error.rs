//! Error types
//!
//! Errors surface only from configuration, construction and file IO.
//! Event processing itself never fails.

use thiserror::Error;

/// Errors that can occur while configuring or driving a gesture pipeline
#[derive(Error, Debug)]
pub enum GestureError {
    #[error("Invalid cursor bounds: min={min}, max={max}")]
    InvalidCursorBounds { min: usize, max: usize },

    #[error("Invalid dead zone: {0} (must be positive)")]
    InvalidDeadZone(i32),

    #[error("Invalid consecutive tap timeout (must be non-zero)")]
    InvalidTimeout,

    #[error("Invalid spring configuration: {0}")]
    InvalidSpring(String),

    #[error("Scheduler closed")]
    SchedulerClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for gesture pipeline operations
pub type GestureResult<T> = Result<T, GestureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GestureError::InvalidCursorBounds { min: 3, max: 2 };
        assert_eq!(err.to_string(), "Invalid cursor bounds: min=3, max=2");
        assert_eq!(GestureError::SchedulerClosed.to_string(), "Scheduler closed");
    }

    #[test]
    fn test_io_error_converts() {
        fn open_missing() -> GestureResult<()> {
            std::fs::read("/definitely/not/here.json")?;
            Ok(())
        }
        assert!(matches!(open_missing(), Err(GestureError::Io(_))));
    }
}
