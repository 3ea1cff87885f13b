//! Constant-velocity Kalman filter: initialization, time propagation, and
//! measurement update for a single track's 6-state (position + velocity).

use nalgebra::Cholesky;

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::types::{GainMat, MeasMat, MeasVec, ObsMat, StateMat, StateVec};

/// Initialization progress. Modeled as a sum type rather than a flag plus
/// scratch fields so `Seeded`'s partial state (`z1`) can't be read in any
/// other phase. `predict`/`update` still check `is_running()` at the top
/// and return `FilterNotRunning` before two detections have seeded a
/// velocity estimate.
#[derive(Clone, Debug, PartialEq)]
pub enum InitPhase {
    /// No detection has been consumed yet.
    Uninitialized,
    /// One detection consumed; position seeded, velocity unknown.
    Seeded { z1: MeasVec },
    /// Two or more detections consumed; `Sf`/`Pf` carry a valid state and
    /// `predict`/`update` are usable.
    Running,
}

/// Observation matrix H: selects position out of the 6-state [x,y,z,vx,vy,vz].
fn observation_matrix() -> ObsMat {
    let mut h = ObsMat::zeros();
    h[(0, 0)] = 1.0;
    h[(1, 1)] = 1.0;
    h[(2, 2)] = 1.0;
    h
}

/// Per-track filter state: posterior, predicted, and initialization phase.
#[derive(Clone, Debug)]
pub struct FilterState {
    pub sf: StateVec,
    pub pf: StateMat,
    pub sp: StateVec,
    pub pp: StateMat,
    pub t_meas: f64,
    pub t_prev: f64,
    pub phase: InitPhase,
}

impl FilterState {
    fn new() -> Self {
        Self {
            sf: StateVec::zeros(),
            pf: StateMat::identity(),
            sp: StateVec::zeros(),
            pp: StateMat::identity(),
            t_meas: 0.0,
            t_prev: 0.0,
            phase: InitPhase::Uninitialized,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, InitPhase::Running)
    }
}

/// The constant-velocity filter for one track.
#[derive(Clone, Debug)]
pub struct CvFilter {
    pub state: FilterState,
    h: ObsMat,
    plant_noise: f64,
    gate_threshold: f64,
    r: MeasMat,
}

impl CvFilter {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            state: FilterState::new(),
            h: observation_matrix(),
            plant_noise: config.plant_noise,
            gate_threshold: config.gate_threshold,
            r: config.measurement_noise,
        }
    }

    pub fn gate_threshold(&self) -> f64 {
        self.gate_threshold
    }

    /// Feed a Cartesian measurement into the initialization sequence.
    ///
    /// - Uninitialized -> Seeded: stores the position, zeroes velocity.
    /// - Seeded -> Running: computes velocity via a two-point finite
    ///   difference `(z1 - z2) / dt` over the two seed measurements (this
    ///   mirrors the source's convention, which is the negative of the
    ///   usual `(z2 - z1) / dt` — see DESIGN.md).
    /// - Running: no further seeding; timestamps still advance so a later
    ///   `predict` sees a consistent `t_prev`.
    pub fn initialize(&mut self, z: MeasVec, t: f64) {
        match self.state.phase.clone() {
            InitPhase::Uninitialized => {
                self.state.sf[0] = z[0];
                self.state.sf[1] = z[1];
                self.state.sf[2] = z[2];
                self.state.t_meas = t;
                self.state.t_prev = t;
                self.state.phase = InitPhase::Seeded { z1: z };
            }
            InitPhase::Seeded { z1 } => {
                self.state.t_prev = self.state.t_meas;
                self.state.t_meas = t;
                let dt = self.state.t_meas - self.state.t_prev;
                let velocity = (z1 - z) / dt;
                self.state.sf[3] = velocity[0];
                self.state.sf[4] = velocity[1];
                self.state.sf[5] = velocity[2];
                self.state.phase = InitPhase::Running;
            }
            InitPhase::Running => {
                self.state.t_prev = self.state.t_meas;
                self.state.t_meas = t;
            }
        }
    }

    /// Propagate the filter to time `t`. Requires `Running`; returns
    /// `FilterNotRunning` otherwise.
    ///
    /// `t_prev` is not mutated here — it only advances when `initialize`
    /// consumes a new measurement — matching the source's (flagged)
    /// behavior where repeated predicts within one scan accumulate `dt`
    /// against the same `t_prev`.
    pub fn predict(&mut self, t: f64) -> Result<()> {
        if !self.state.is_running() {
            return Err(TrackerError::FilterNotRunning);
        }

        let dt = t - self.state.t_prev;
        if dt < 0.0 {
            return Err(TrackerError::NonMonotonicTime { t, dt });
        }

        let mut phi = StateMat::identity();
        phi[(0, 3)] = dt;
        phi[(1, 4)] = dt;
        phi[(2, 5)] = dt;

        let dt2 = dt * dt / 2.0;
        let dt3 = dt * dt * dt / 3.0;
        let mut q = StateMat::zeros();
        q[(0, 0)] = dt3;
        q[(1, 1)] = dt3;
        q[(2, 2)] = dt3;
        q[(0, 3)] = dt2;
        q[(1, 4)] = dt2;
        q[(2, 5)] = dt2;
        q[(3, 0)] = dt2;
        q[(4, 1)] = dt2;
        q[(5, 2)] = dt2;
        q[(3, 3)] = dt;
        q[(4, 4)] = dt;
        q[(5, 5)] = dt;
        q *= self.plant_noise;

        self.state.sp = phi * self.state.sf;
        self.state.pp = phi * self.state.pf * phi.transpose() + q;
        self.state.t_meas = t;
        Ok(())
    }

    fn innovation(&self, z: &MeasVec) -> MeasVec {
        z - self.h * self.state.sp
    }

    fn innovation_cov(&self) -> MeasMat {
        self.h * self.state.pp * self.h.transpose() + self.r
    }

    /// Mahalanobis-squared distance of `z` against the current prediction.
    /// Returns `None` if the innovation covariance is numerically singular.
    pub fn mahalanobis_sq(&self, z: &MeasVec) -> Option<f64> {
        let s = self.innovation_cov();
        let chol = Cholesky::new(s)?;
        let nu = self.innovation(z);
        Some((nu.transpose() * chol.solve(&nu))[0])
    }

    /// True iff `z` falls inside the validation gate.
    pub fn gating(&self, z: &MeasVec) -> Option<bool> {
        self.mahalanobis_sq(z).map(|d2| d2 < self.gate_threshold)
    }

    /// Measurement update. Requires `Running`; returns `FilterNotRunning`
    /// otherwise. Returns `Ok(None)` (a recovered `NumericalSingularity`) if
    /// S is not invertible; the caller should keep the predicted state as
    /// the posterior and log the event.
    pub fn update(&mut self, z: &MeasVec) -> Result<Option<()>> {
        if !self.state.is_running() {
            return Err(TrackerError::FilterNotRunning);
        }

        let s = self.innovation_cov();
        let Some(chol) = Cholesky::new(s) else {
            return Ok(None);
        };

        let nu = self.innovation(z);
        let hp = self.h * self.state.pp; // 3x6
        let k_t = chol.solve(&hp); // solves S * K^T = H*Pp  (S symmetric)
        let k: GainMat = k_t.transpose();

        self.state.sf = self.state.sp + k * nu;
        let i_kh = StateMat::identity() - k * self.h;
        let pf = i_kh * self.state.pp;
        self.state.pf = (pf + pf.transpose()) * 0.5;
        Ok(Some(()))
    }

    /// Advance the posterior without a measurement: `Sf = Sp`, `Pf = Pp`.
    /// Used on `NoAssociation`/`NumericalSingularity` per the error model.
    pub fn carry_prediction_forward(&mut self) {
        self.state.sf = self.state.sp;
        self.state.pf = self.state.pp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::sph_to_cart;
    use approx::assert_relative_eq;

    fn config() -> TrackerConfig {
        TrackerConfig::default()
    }

    #[test]
    fn first_detection_seeds_position_only() {
        let mut f = CvFilter::new(&config());
        let z = sph_to_cart(45.0, 10.0, 1000.0);
        f.initialize(z, 0.0);
        assert!(matches!(f.state.phase, InitPhase::Seeded { .. }));
        assert_relative_eq!(f.state.sf[0], z[0]);
        assert_relative_eq!(f.state.sf[3], 0.0);
    }

    #[test]
    fn second_detection_computes_velocity_per_source_convention() {
        let mut f = CvFilter::new(&config());
        let z1 = sph_to_cart(45.0, 10.0, 1000.0);
        let z2 = sph_to_cart(45.0, 10.0, 1010.0);
        f.initialize(z1, 0.0);
        f.initialize(z2, 1.0);
        assert!(f.state.is_running());
        let expected = (z1 - z2) / 1.0;
        assert_relative_eq!(f.state.sf[3], expected[0], epsilon = 1e-9);
        assert_relative_eq!(f.state.sf[4], expected[1], epsilon = 1e-9);
        assert_relative_eq!(f.state.sf[5], expected[2], epsilon = 1e-9);
    }

    #[test]
    fn predict_rejects_negative_dt() {
        let mut f = CvFilter::new(&config());
        f.initialize(sph_to_cart(0.0, 0.0, 1000.0), 5.0);
        f.initialize(sph_to_cart(0.0, 0.0, 1010.0), 6.0);
        let err = f.predict(5.5).unwrap_err();
        assert!(matches!(err, TrackerError::NonMonotonicTime { .. }));
    }

    #[test]
    fn predict_and_update_reject_calls_before_running() {
        let mut f = CvFilter::new(&config());
        assert!(matches!(f.predict(1.0).unwrap_err(), TrackerError::FilterNotRunning));
        let z = sph_to_cart(0.0, 0.0, 1000.0);
        assert!(matches!(f.update(&z).unwrap_err(), TrackerError::FilterNotRunning));

        f.initialize(z, 0.0);
        assert!(matches!(f.predict(1.0).unwrap_err(), TrackerError::FilterNotRunning));
        assert!(matches!(f.update(&z).unwrap_err(), TrackerError::FilterNotRunning));
    }

    #[test]
    fn update_preserves_symmetric_covariance() {
        let mut f = CvFilter::new(&config());
        f.initialize(sph_to_cart(45.0, 10.0, 1000.0), 0.0);
        f.initialize(sph_to_cart(45.0, 10.0, 1010.0), 1.0);
        f.predict(2.0).unwrap();
        let z = sph_to_cart(45.0, 10.0, 1020.0);
        f.update(&z)
            .expect("filter is running")
            .expect("S must be invertible with R = I");
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(f.state.pf[(i, j)], f.state.pf[(j, i)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn filter_converges_on_noise_free_constant_velocity_stream() {
        let mut f = CvFilter::new(&config());
        let vx = 50.0;
        let true_pos = |t: f64| MeasVec::new(vx * t, 0.0, 0.0);

        f.initialize(true_pos(0.0), 0.0);
        f.initialize(true_pos(1.0), 1.0);

        let mut t = 2.0;
        let mut last_err = f64::MAX;
        for _ in 0..30 {
            f.predict(t).unwrap();
            let z = true_pos(t);
            f.update(&z).unwrap().unwrap();
            let err = (f.state.sf[0] - true_pos(t)[0]).abs();
            last_err = err;
            t += 1.0;
        }
        assert!(last_err < 1e-6, "position error did not converge: {last_err}");
        assert_relative_eq!(f.state.sf[3], vx, epsilon = 1e-3);
    }
}
