//! Frame cadence and miss-streak handling.
//!
//! The stabilizer owns the [`DetectionSnapshot`] and decides, per frame,
//! whether detection runs at all and what offset gets published afterwards.
//! It holds no lock of its own; the pipeline wraps it in one mutex.

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::{DetectionSnapshot, PipelineError};

/// Cadence and miss-streak settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerParams {
    /// Frames arriving sooner than this after the last processed one are skipped.
    pub min_frame_interval_ms: u64,
    /// Consecutive misses after which the offset falls back to the neutral sentinel.
    pub miss_threshold: u32,
    /// Neutral sentinel used before the first frame has been processed.
    pub initial_frame_width: u32,
}

impl Default for StabilizerParams {
    fn default() -> Self {
        Self {
            min_frame_interval_ms: 250,
            miss_threshold: 5,
            initial_frame_width: 640,
        }
    }
}

impl StabilizerParams {
    #[inline]
    pub fn min_frame_interval(&self) -> Duration {
        Duration::from_millis(self.min_frame_interval_ms)
    }
}

/// What happened to one delivered frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameOutcome {
    /// Arrived inside the cadence window; nothing ran, nothing changed.
    Skipped,
    /// A target was selected and its offset published.
    Hit { offset: f64, targets: usize },
    /// No target. `reset_to_neutral` is set on the frame that completed a
    /// miss streak and moved the offset to the sentinel.
    Miss {
        consecutive_misses: u32,
        reset_to_neutral: bool,
    },
}

impl FrameOutcome {
    #[inline]
    pub fn is_processed(&self) -> bool {
        !matches!(self, FrameOutcome::Skipped)
    }
}

/// Throttle plus hit/miss bookkeeping.
///
/// States: idle (waiting for the cadence window to pass), processing
/// (admitted, detection running), then either publishing a hit or
/// publishing a held/neutral value.
#[derive(Clone, Debug)]
pub struct TemporalStabilizer {
    params: StabilizerParams,
    snapshot: DetectionSnapshot,
    last_processed: Option<Instant>,
}

impl TemporalStabilizer {
    pub fn new(params: StabilizerParams) -> Result<Self, PipelineError> {
        if params.miss_threshold == 0 {
            return Err(PipelineError::ZeroMissThreshold);
        }
        Ok(Self {
            snapshot: DetectionSnapshot::neutral(params.initial_frame_width),
            params,
            last_processed: None,
        })
    }

    #[inline]
    pub fn params(&self) -> &StabilizerParams {
        &self.params
    }

    #[inline]
    pub fn snapshot(&self) -> DetectionSnapshot {
        self.snapshot
    }

    /// Decide whether a frame stamped `at` gets processed.
    ///
    /// An admitted frame becomes the new reference for the cadence window.
    /// Timestamps older than the last processed frame are skipped.
    pub fn admit(&mut self, at: Instant) -> bool {
        if let Some(prev) = self.last_processed {
            let gap = at.saturating_duration_since(prev);
            if gap < self.params.min_frame_interval() {
                trace!("frame skipped, {} ms since last processed", gap.as_millis());
                return false;
            }
        }
        self.last_processed = Some(at);
        true
    }

    /// Publish a fresh offset immediately and end any miss streak.
    pub fn record_hit(&mut self, offset: f64, targets: usize, elapsed: Duration) -> FrameOutcome {
        let snap = &mut self.snapshot;
        snap.offset = offset;
        snap.consecutive_misses = 0;
        snap.hit_count += 1;
        snap.frame_count += 1;
        snap.cumulative_processing_ms = snap
            .cumulative_processing_ms
            .saturating_add(duration_ms(elapsed));
        debug!("hit: offset={offset:.1} targets={targets}");
        FrameOutcome::Hit { offset, targets }
    }

    /// Hold the current offset; after `miss_threshold` misses in a row,
    /// fall back to the neutral sentinel (`frame_width`) and re-arm the streak.
    pub fn record_miss(&mut self, frame_width: u32, elapsed: Duration) -> FrameOutcome {
        let threshold = self.params.miss_threshold;
        let snap = &mut self.snapshot;
        snap.consecutive_misses += 1;
        snap.frame_count += 1;
        snap.cumulative_processing_ms = snap
            .cumulative_processing_ms
            .saturating_add(duration_ms(elapsed));

        let consecutive_misses = snap.consecutive_misses;
        let reset_to_neutral = consecutive_misses >= threshold;
        if reset_to_neutral {
            snap.offset = f64::from(frame_width);
            snap.consecutive_misses = 0;
            info!("{consecutive_misses} misses in a row, offset reset to {frame_width}");
        } else {
            debug!("miss {consecutive_misses}/{threshold}, holding offset {:.1}", snap.offset);
        }

        FrameOutcome::Miss {
            consecutive_misses,
            reset_to_neutral,
        }
    }
}

fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stabilizer() -> TemporalStabilizer {
        TemporalStabilizer::new(StabilizerParams::default()).expect("params")
    }

    #[test]
    fn first_frame_is_always_admitted() {
        let mut st = stabilizer();
        assert!(st.admit(Instant::now()));
    }

    #[test]
    fn frames_inside_the_window_are_skipped() {
        let mut st = stabilizer();
        let t0 = Instant::now();
        assert!(st.admit(t0));
        assert!(!st.admit(t0 + Duration::from_millis(100)));
        assert!(!st.admit(t0 + Duration::from_millis(249)));
        assert!(st.admit(t0 + Duration::from_millis(250)));
        // The window restarts at the last admitted frame, not the skipped ones.
        assert!(!st.admit(t0 + Duration::from_millis(400)));
        assert!(st.admit(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn stale_timestamps_are_skipped() {
        let mut st = stabilizer();
        let t0 = Instant::now() + Duration::from_secs(1);
        assert!(st.admit(t0));
        assert!(!st.admit(t0 - Duration::from_millis(500)));
    }

    #[test]
    fn hit_updates_offset_and_counters() {
        let mut st = stabilizer();
        st.record_miss(320, Duration::from_millis(3));
        let outcome = st.record_hit(-12.0, 2, Duration::from_millis(4));
        assert_eq!(
            outcome,
            FrameOutcome::Hit {
                offset: -12.0,
                targets: 2
            }
        );

        let snap = st.snapshot();
        assert_eq!(snap.offset, -12.0);
        assert_eq!(snap.consecutive_misses, 0);
        assert_eq!(snap.hit_count, 1);
        assert_eq!(snap.frame_count, 2);
        assert_eq!(snap.cumulative_processing_ms, 7);
    }

    #[test]
    fn misses_hold_the_offset_until_the_streak_completes() {
        let mut st = stabilizer();
        st.record_hit(25.0, 1, Duration::ZERO);

        for n in 1..5 {
            let outcome = st.record_miss(320, Duration::ZERO);
            assert_eq!(
                outcome,
                FrameOutcome::Miss {
                    consecutive_misses: n,
                    reset_to_neutral: false
                }
            );
            assert_eq!(st.snapshot().offset, 25.0);
        }

        let outcome = st.record_miss(320, Duration::ZERO);
        assert_eq!(
            outcome,
            FrameOutcome::Miss {
                consecutive_misses: 5,
                reset_to_neutral: true
            }
        );
        let snap = st.snapshot();
        assert_eq!(snap.offset, 320.0);
        assert_eq!(snap.consecutive_misses, 0);
        assert_eq!(snap.frame_count, 6);
        assert_eq!(snap.hit_count, 1);
    }

    #[test]
    fn neutral_reset_rearms_instead_of_repeating() {
        let mut st = stabilizer();
        let resets = (0..12)
            .map(|_| st.record_miss(320, Duration::ZERO))
            .filter(|o| {
                matches!(
                    o,
                    FrameOutcome::Miss {
                        reset_to_neutral: true,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(resets, 2);
        assert_eq!(st.snapshot().consecutive_misses, 2);
    }

    #[test]
    fn initial_offset_is_the_configured_sentinel() {
        let st = TemporalStabilizer::new(StabilizerParams {
            initial_frame_width: 320,
            ..StabilizerParams::default()
        })
        .expect("params");
        assert_eq!(st.snapshot(), DetectionSnapshot::neutral(320));
    }

    #[test]
    fn zero_miss_threshold_is_rejected() {
        let params = StabilizerParams {
            miss_threshold: 0,
            ..StabilizerParams::default()
        };
        assert!(matches!(
            TemporalStabilizer::new(params),
            Err(PipelineError::ZeroMissThreshold)
        ));
    }
}
