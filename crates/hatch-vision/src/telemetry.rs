//! Telemetry transport contract and two sinks.
//!
//! [`SharedTable`] mirrors the robot's named network table: numeric entries
//! that other threads poll whenever they like. [`JsonLinesSink`] appends one
//! JSON record per publish to any writer (log file, stdout).

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::DetectionSnapshot;

/// Table name the robot code polls for hatch alignment.
pub const DEFAULT_TABLE_NAME: &str = "Vision_Hatch";

pub const OFFSET_KEY: &str = "offset";
pub const MISSES_KEY: &str = "misses";
pub const HITS_KEY: &str = "hits";
pub const COUNT_KEY: &str = "count";
pub const DURATION_KEY: &str = "duration";
/// Average processing time per frame; only written once a frame was processed.
pub const TIMING_KEY: &str = "timing";

/// One publish tick worth of telemetry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub offset: f64,
    pub consecutive_misses: u32,
    pub hit_count: u64,
    pub frame_count: u64,
    pub cumulative_processing_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_processing_ms: Option<f64>,
}

impl From<DetectionSnapshot> for TelemetryRecord {
    fn from(snap: DetectionSnapshot) -> Self {
        Self {
            offset: snap.offset,
            consecutive_misses: snap.consecutive_misses,
            hit_count: snap.hit_count,
            frame_count: snap.frame_count,
            cumulative_processing_ms: snap.cumulative_processing_ms,
            average_processing_ms: snap.average_processing_ms(),
        }
    }
}

/// Errors reported by a telemetry sink.
#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("telemetry transport unavailable: {0}")]
    Unavailable(String),
}

/// Receives the snapshot on every publish tick.
pub trait TelemetrySink {
    fn publish(&self, record: &TelemetryRecord) -> Result<(), TelemetryError>;
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for &T {
    fn publish(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        (**self).publish(record)
    }
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Arc<T> {
    fn publish(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        (**self).publish(record)
    }
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Box<T> {
    fn publish(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        (**self).publish(record)
    }
}

/// In-process named table of numeric entries.
#[derive(Debug)]
pub struct SharedTable {
    name: String,
    entries: RwLock<BTreeMap<String, f64>>,
}

impl Default for SharedTable {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_NAME)
    }
}

impl SharedTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    /// Copy of all entries, consistent as of one publish.
    pub fn entries(&self) -> BTreeMap<String, f64> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TelemetrySink for SharedTable {
    fn publish(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut put = |key: &str, value: f64| {
            entries.insert(key.to_owned(), value);
        };
        put(OFFSET_KEY, record.offset);
        put(MISSES_KEY, f64::from(record.consecutive_misses));
        put(HITS_KEY, record.hit_count as f64);
        put(COUNT_KEY, record.frame_count as f64);
        put(DURATION_KEY, record.cumulative_processing_ms as f64);
        if let Some(timing) = record.average_processing_ms {
            put(TIMING_KEY, timing);
        }
        Ok(())
    }
}

/// Writes every record as one JSON line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn publish(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        let line = serde_json::to_string(record)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}
