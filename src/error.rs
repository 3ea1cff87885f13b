use thiserror::Error;

/// Errors the core surfaces to the caller.
///
/// Per the propagation policy, only structural failures live here.
/// Numerical and gating failures (`NumericalSingularity`, an empty
/// validation gate) are recovered locally and modeled as return values
/// instead — see `filter::CvFilter::update` and `associator::select`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("malformed detection: {0}")]
    MalformedInput(String),

    #[error("non-monotonic time: t={t} implies dt={dt} against the filter's previous timestamp")]
    NonMonotonicTime { t: f64, dt: f64 },

    #[error("filter is not running: predict/update require two detections to have seeded a velocity estimate")]
    FilterNotRunning,
}

pub type Result<T> = std::result::Result<T, TrackerError>;
