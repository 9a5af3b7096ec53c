use hatch_vision_detector::ParamsError;

/// Errors raised while assembling a pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error("miss threshold must be at least 1")]
    ZeroMissThreshold,
}
