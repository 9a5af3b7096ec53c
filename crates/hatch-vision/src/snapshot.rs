use serde::{Deserialize, Serialize};

/// Result state shared between frame processing and telemetry publication.
///
/// All fields describe the same processed frame; the pipeline only ever
/// copies the struct as a whole under its lock.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionSnapshot {
    /// Signed target offset in pixels, or the neutral sentinel (frame width).
    pub offset: f64,
    pub consecutive_misses: u32,
    pub hit_count: u64,
    pub frame_count: u64,
    pub cumulative_processing_ms: u64,
}

impl DetectionSnapshot {
    /// Initial state: nothing processed, offset at the neutral sentinel.
    pub fn neutral(frame_width: u32) -> Self {
        Self {
            offset: f64::from(frame_width),
            consecutive_misses: 0,
            hit_count: 0,
            frame_count: 0,
            cumulative_processing_ms: 0,
        }
    }

    /// Mean processing time per processed frame, if any frame was processed.
    pub fn average_processing_ms(&self) -> Option<f64> {
        (self.frame_count > 0)
            .then(|| self.cumulative_processing_ms as f64 / self.frame_count as f64)
    }
}
