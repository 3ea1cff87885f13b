pub mod linalg;

pub use linalg::*;

use serde::{Deserialize, Serialize};

/// A single radar detection: range (m), azimuth/elevation (degrees), and the
/// time it was observed (seconds). Immutable once ingested.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub r: f64,
    pub az_deg: f64,
    pub el_deg: f64,
    pub t: f64,
}

impl Detection {
    pub fn new(r: f64, az_deg: f64, el_deg: f64, t: f64) -> Self {
        Self { r, az_deg, el_deg, t }
    }
}
