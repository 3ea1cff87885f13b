use crate::types::MeasMat;

/// Tunable parameters for the filter, grouper, and associator.
///
/// Defaults match the values the core was distilled from; `gate_threshold`
/// in particular is effectively infinite for 3 degrees of freedom at its
/// default and should be overridden with 7.815 (95%) or 9.348 (97.5%) to
/// get meaningful gating.
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Scalar multiplier on the process-noise matrix Q.
    pub plant_noise: f64,
    /// Chi-squared cutoff for 3-DoF Mahalanobis gating.
    pub gate_threshold: f64,
    /// Measurement noise covariance R.
    pub measurement_noise: MeasMat,
    /// Grouper window: detections within this many seconds of a group's
    /// first timestamp belong to the same scan.
    pub max_time_diff: f64,
    /// Tracks preallocated in the FREE state at startup.
    pub initial_track_pool: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            plant_noise: 20.0,
            gate_threshold: 9000.21,
            measurement_noise: MeasMat::identity(),
            max_time_diff: 0.050,
            initial_track_pool: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.plant_noise, 20.0);
        assert_eq!(cfg.gate_threshold, 9000.21);
        assert_eq!(cfg.max_time_diff, 0.050);
        assert_eq!(cfg.initial_track_pool, 5);
        assert_eq!(cfg.measurement_noise, MeasMat::identity());
    }
}
