use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use hatch_vision_core::Frame;
use hatch_vision_detector::{ContourExtractor, HatchTargetDetector};
use log::debug;

use crate::{
    DetectionSnapshot, FrameOutcome, HatchVisionConfig, PipelineError, StabilizerParams,
    TelemetryError, TelemetryRecord, TelemetrySink, TemporalStabilizer,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Frame handler plus publisher for hatch alignment.
///
/// The external frame driver calls [`process_frame`](Self::process_frame)
/// once per captured frame (serialized) and [`publish`](Self::publish) on
/// its own cadence, possibly from another thread. Both take `&self`; the
/// shared state sits behind one mutex that is held only while fields are
/// copied, never while geometry runs or the sink writes.
pub struct HatchTargetPipeline<E, S> {
    detector: HatchTargetDetector<E>,
    state: Mutex<TemporalStabilizer>,
    sink: S,
}

impl<E, S> HatchTargetPipeline<E, S> {
    pub fn new(
        detector: HatchTargetDetector<E>,
        stabilizer: StabilizerParams,
        sink: S,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            detector,
            state: Mutex::new(TemporalStabilizer::new(stabilizer)?),
            sink,
        })
    }

    /// Build the detector and stabilizer from one config.
    pub fn from_config(
        config: &HatchVisionConfig,
        extractor: E,
        sink: S,
    ) -> Result<Self, PipelineError> {
        let detector = HatchTargetDetector::new(config.detector.clone(), extractor)?;
        Self::new(detector, config.stabilizer.clone(), sink)
    }

    #[inline]
    pub fn detector(&self) -> &HatchTargetDetector<E> {
        &self.detector
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consistent copy of the current detection state.
    pub fn snapshot(&self) -> DetectionSnapshot {
        self.state().snapshot()
    }

    /// Handle a frame captured now.
    pub fn process_frame<F>(&self, frame: &F) -> FrameOutcome
    where
        F: Frame + ?Sized,
        E: ContourExtractor<F>,
    {
        self.process_frame_at(frame, Instant::now())
    }

    /// Handle a frame captured at `at`.
    ///
    /// Frames inside the cadence window return [`FrameOutcome::Skipped`]
    /// without running detection or touching any counter.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, at), fields(width = frame.width()))
    )]
    pub fn process_frame_at<F>(&self, frame: &F, at: Instant) -> FrameOutcome
    where
        F: Frame + ?Sized,
        E: ContourExtractor<F>,
    {
        if !self.state().admit(at) {
            return FrameOutcome::Skipped;
        }

        let started = Instant::now();
        let width = frame.width();
        let detection = self.detector.detect(frame);
        let selected = detection
            .selected(f64::from(width))
            .map(|target| target.offset(f64::from(width)));
        let elapsed = started.elapsed();
        debug!(
            "processed frame: {} targets in {} ms",
            detection.targets.len(),
            elapsed.as_millis()
        );

        let mut state = self.state();
        match selected {
            Some(offset) => state.record_hit(offset, detection.targets.len(), elapsed),
            None => state.record_miss(width, elapsed),
        }
    }

    fn state(&self) -> MutexGuard<'_, TemporalStabilizer> {
        // Snapshot updates are plain field stores; recover from poisoning.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E, S: TelemetrySink> HatchTargetPipeline<E, S> {
    /// Copy the snapshot under the lock and forward it to the sink.
    ///
    /// Returns the published snapshot.
    pub fn publish(&self) -> Result<DetectionSnapshot, TelemetryError> {
        let snapshot = self.snapshot();
        self.sink.publish(&TelemetryRecord::from(snapshot))?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SharedTable;
    use approx::assert_relative_eq;
    use hatch_vision_core::{Contour, OrientedRect};
    use hatch_vision_detector::{ColorProfile, HatchDetectorParams};
    use nalgebra::Point2;
    use std::cell::Cell;
    use std::time::Duration;

    struct TestFrame(u32);

    impl Frame for TestFrame {
        fn width(&self) -> u32 {
            self.0
        }
    }

    fn strip(cx: f64) -> Contour {
        OrientedRect::new(Point2::new(cx, 100.0), 8.0, 40.0, -30.0)
            .corners()
            .to_vec()
    }

    #[test]
    fn skipped_frames_do_not_run_the_extractor() {
        let calls = Cell::new(0usize);
        let extractor = |_: &TestFrame, _: &ColorProfile| {
            calls.set(calls.get() + 1);
            Vec::<Contour>::new()
        };
        let detector =
            HatchTargetDetector::new(HatchDetectorParams::default(), extractor).expect("params");
        let pipeline =
            HatchTargetPipeline::new(detector, StabilizerParams::default(), SharedTable::default())
                .expect("pipeline");

        let t0 = Instant::now();
        assert!(pipeline.process_frame_at(&TestFrame(320), t0).is_processed());
        assert_eq!(calls.get(), 3);

        let outcome = pipeline.process_frame_at(&TestFrame(320), t0 + Duration::from_millis(100));
        assert_eq!(outcome, FrameOutcome::Skipped);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn publish_forwards_the_snapshot() {
        let extractor = |_: &TestFrame, _: &ColorProfile| vec![strip(100.0), strip(160.0)];
        let pipeline = HatchTargetPipeline::from_config(
            &HatchVisionConfig::default(),
            extractor,
            SharedTable::default(),
        )
        .expect("pipeline");

        match pipeline.process_frame(&TestFrame(320)) {
            FrameOutcome::Hit { offset, targets } => {
                assert_relative_eq!(offset, -30.0, epsilon = 1e-9);
                assert_eq!(targets, 1);
            }
            other => panic!("expected a hit, got {other:?}"),
        }

        let published = pipeline.publish().expect("publish");
        assert_eq!(published, pipeline.snapshot());
        assert_eq!(pipeline.sink().get("hits"), Some(1.0));
        assert_eq!(pipeline.sink().get("count"), Some(1.0));
    }
}
