//! Recording and replay of cursor streams
//!
//! A [`CursorRecorder`] sits anywhere in a pipeline and keeps every cursor set
//! passing through it. Recordings are stored as JSON and can be fed back into
//! any listener, which makes gesture behaviour reproducible without hardware.

use crate::chain::{Chainable, Listener, Listeners, NodeKind};
use crate::error::GestureResult;
use crate::input::{Cursor, CursorEvent, UserId};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedFrame {
    /// Milliseconds since the first recorded frame
    pub time_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
    pub cursors: Vec<Cursor>,
}

#[derive(Default)]
struct Recording {
    origin: Option<Instant>,
    frames: Vec<RecordedFrame>,
}

/// Pass-through node that records every event
pub struct CursorRecorder {
    recording: ParkingMutex<Recording>,
    listeners: Listeners<CursorEvent>,
}

impl Default for CursorRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            recording: ParkingMutex::new(Recording::default()),
            listeners: Listeners::new(),
        }
    }

    /// Copy of every frame recorded so far.
    pub fn frames(&self) -> Vec<RecordedFrame> {
        self.recording.lock().frames.clone()
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.recording.lock().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recording.lock().frames.is_empty()
    }

    /// Drop all frames. The next frame recorded starts at time zero.
    pub fn clear(&self) {
        *self.recording.lock() = Recording::default();
    }

    /// Write the recording as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> GestureResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&self.recording.lock().frames)?;
        std::fs::write(path, data)?;
        tracing::info!(frames = self.len(), "Cursor recording written to {:?}", path);
        Ok(())
    }
}

impl Listener<CursorEvent> for CursorRecorder {
    fn process(&self, event: &CursorEvent) {
        {
            let mut recording = self.recording.lock();
            let origin = *recording.origin.get_or_insert(event.timestamp);
            let elapsed = event.timestamp.saturating_duration_since(origin);
            recording.frames.push(RecordedFrame {
                time_ms: elapsed.as_nanos() as f64 / 1_000_000.0,
                user: event.user,
                cursors: event.cursors.clone(),
            });
        }
        self.listeners.emit(event);
    }
}

impl Chainable<CursorEvent> for CursorRecorder {
    fn kind(&self) -> NodeKind {
        NodeKind::Recorder
    }

    fn listeners(&self) -> &Listeners<CursorEvent> {
        &self.listeners
    }
}

/// Parse a recording from JSON text.
pub fn frames_from_json_str(json: &str) -> GestureResult<Vec<RecordedFrame>> {
    Ok(serde_json::from_str(json)?)
}

/// Read a recording written by [`CursorRecorder::write_json`].
pub fn load_frames(path: &Path) -> GestureResult<Vec<RecordedFrame>> {
    let content = std::fs::read_to_string(path)?;
    let frames = frames_from_json_str(&content)?;
    tracing::info!(frames = frames.len(), "Loaded cursor recording from {:?}", path);
    Ok(frames)
}

/// Feed `frames` to `listener` in order, stamping each with `base + time_ms`.
///
/// Frames are delivered back to back; the timestamps carry the timing.
pub fn replay(frames: &[RecordedFrame], listener: &dyn Listener<CursorEvent>, base: Instant) {
    for frame in frames {
        let offset = Duration::try_from_secs_f64(frame.time_ms / 1000.0).unwrap_or_default();
        let mut event = CursorEvent::new(frame.cursors.clone()).with_timestamp(base + offset);
        event.user = frame.user;
        listener.process(&event);
    }
}
