/// Invalid detector configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("at least one color profile is required")]
    NoColorProfiles,
    #[error("{name} must be finite (got {value})")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} range is empty (min={min}, max={max})")]
    EmptyRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
}
