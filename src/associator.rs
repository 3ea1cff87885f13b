//! Clustering (validation gate) and single-target JPDA-reduced hypothesis
//! selection over one scan group.

use crate::coords::sph_to_cart;
use crate::filter::CvFilter;
use crate::types::{Detection, MeasVec};

/// A surviving detection, scored against the current prediction.
#[derive(Clone, Debug)]
struct Hypothesis {
    index: usize,
    detection: Detection,
    measurement: MeasVec,
    d2: f64,
}

/// Result of associating one scan group against a `Running` filter.
#[derive(Clone, Debug, PartialEq)]
pub enum AssociationOutcome {
    /// The maximum-a-posteriori detection and its marginal probability.
    Selected {
        index: usize,
        detection: Detection,
        measurement: MeasVec,
        probability: f64,
    },
    /// No detection survived the gate, or S was numerically singular.
    NoAssociation,
}

/// Select the best-hypothesis detection from `group` against `filter`,
/// which must already have been `predict`-ed to the group's reference
/// time.
///
/// 1. Clustering: keep detections whose Mahalanobis-squared distance
///    against (Sp, Pp) is below the gate threshold.
/// 2. One hypothesis per surviving detection.
/// 3. Weight each hypothesis by `exp(-0.5 * d2)` (the Gaussian
///    normalization constant is dropped since all hypotheses share S).
/// 4. Normalize to marginal probabilities; fall back to uniform if every
///    weight underflowed to zero.
/// 5. Return the maximum, breaking ties by earliest position in the group.
pub fn select(group: &[Detection], filter: &CvFilter) -> AssociationOutcome {
    let mut hypotheses = Vec::with_capacity(group.len());

    for (index, detection) in group.iter().enumerate() {
        let measurement = sph_to_cart(detection.az_deg, detection.el_deg, detection.r);
        match filter.mahalanobis_sq(&measurement) {
            Some(d2) => {
                if d2 < filter.gate_threshold() {
                    hypotheses.push(Hypothesis {
                        index,
                        detection: *detection,
                        measurement,
                        d2,
                    });
                }
            }
            None => {
                log::warn!("innovation covariance is numerically singular; skipping scan update");
                return AssociationOutcome::NoAssociation;
            }
        }
    }

    if hypotheses.is_empty() {
        return AssociationOutcome::NoAssociation;
    }

    let weights: Vec<f64> = hypotheses.iter().map(|h| (-0.5 * h.d2).exp()).collect();
    let total: f64 = weights.iter().sum();

    let probabilities: Vec<f64> = if total == 0.0 {
        vec![1.0 / hypotheses.len() as f64; hypotheses.len()]
    } else {
        weights.iter().map(|w| w / total).collect()
    };

    let (best_index, probability) = probabilities
        .iter()
        .enumerate()
        .fold((0usize, f64::MIN), |(bi, bv), (i, &v)| {
            if v > bv {
                (i, v)
            } else {
                (bi, bv)
            }
        });

    let winner = &hypotheses[best_index];
    AssociationOutcome::Selected {
        index: winner.index,
        detection: winner.detection,
        measurement: winner.measurement,
        probability,
    }
}
