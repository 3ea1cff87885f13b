//! Linear algebra type aliases for the CV Kalman filter.
//!
//! Fixed-size `nalgebra` types throughout: state is 6-dimensional
//! (position + velocity), measurements are 3-dimensional Cartesian
//! positions. Fixed dimensions let the compiler specialize the small
//! matrix inversions on the hot path instead of allocating.

use nalgebra::{SMatrix, SVector};

pub const STATE_DIM: usize = 6;
pub const MEAS_DIM: usize = 3;

pub type StateVec = SVector<f64, STATE_DIM>;
pub type StateMat = SMatrix<f64, STATE_DIM, STATE_DIM>;

pub type MeasVec = SVector<f64, MEAS_DIM>;
pub type MeasMat = SMatrix<f64, MEAS_DIM, MEAS_DIM>;

/// Observation matrix H: selects position out of the 6-state.
pub type ObsMat = SMatrix<f64, MEAS_DIM, STATE_DIM>;
/// H^T
pub type ObsMatT = SMatrix<f64, STATE_DIM, MEAS_DIM>;
/// Kalman gain K
pub type GainMat = SMatrix<f64, STATE_DIM, MEAS_DIM>;
