//! End-to-end orchestration: group a detection stream into scans, feed a
//! single track's initialization, then predict/associate/update per scan.

use crate::associator::{self, AssociationOutcome};
use crate::config::TrackerConfig;
use crate::coords::sph_to_cart;
use crate::error::Result;
use crate::filter::CvFilter;
use crate::grouper::group_detections;
use crate::track::TrackManager;
use crate::types::{Detection, StateVec};
use serde::{Deserialize, Serialize};

/// One filtered output: the scan's reference time, the associated
/// detection's spherical coordinates (if any), and the posterior state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilteredRecord {
    pub t: f64,
    pub r: f64,
    pub az_deg: f64,
    pub el_deg: f64,
    pub state: StateVec,
}

/// Runs the full pipeline over a chronologically ordered detection stream
/// for a single target and returns one `FilteredRecord` per scan that
/// successfully associated.
///
/// The first two detections seed the filter's position and velocity
/// (`filter::CvFilter::initialize`) and produce no output record, matching
/// the source's behavior of not emitting a track until it is `Running`.
/// Every scan after that predicts to the scan's first timestamp, attempts
/// association, and either updates on the winning detection or carries the
/// prediction forward with no emitted record.
pub fn run(detections: &[Detection], config: &TrackerConfig) -> Result<Vec<FilteredRecord>> {
    let groups = group_detections(detections, config.max_time_diff);
    let mut manager = TrackManager::new(config.initial_track_pool, CvFilter::new(config));
    let mut records = Vec::new();

    let template = CvFilter::new(config);
    let track_id = manager.get_free_track();
    manager.occupy(track_id, &template);

    for group in groups {
        let Some(first) = group.first() else { continue };

        if !manager.track(track_id).filter.state.is_running() {
            for detection in &group {
                let z = sph_to_cart(detection.az_deg, detection.el_deg, detection.r);
                manager.track_mut(track_id).filter.initialize(z, detection.t);
                manager.track_mut(track_id).assign(*detection);
            }
            continue;
        }

        let base_t = first.t;
        manager.track_mut(track_id).filter.predict(base_t)?;

        let outcome = associator::select(&group, &manager.track(track_id).filter);
        match outcome {
            AssociationOutcome::Selected {
                measurement,
                detection,
                ..
            } => {
                // The filter is `Running` by construction here: this branch
                // only runs after a successful `predict`, which itself
                // requires `Running`. `FilterNotRunning` can't occur.
                if manager.track_mut(track_id).filter.update(&measurement)?.is_none() {
                    log::warn!("numerical singularity at t={base_t}; carrying prediction forward");
                    manager.track_mut(track_id).filter.carry_prediction_forward();
                } else {
                    manager.track_mut(track_id).assign(detection);
                }
            }
            AssociationOutcome::NoAssociation => {
                manager.track_mut(track_id).filter.carry_prediction_forward();
                continue;
            }
        }

        let state = manager.track(track_id).filter.state.sf;
        let pos = crate::types::MeasVec::new(state[0], state[1], state[2]);
        let (r, az_deg, el_deg) = crate::coords::cart_to_sph(&pos);
        records.push(FilteredRecord {
            t: base_t,
            r,
            az_deg,
            el_deg,
            state,
        });
    }

    Ok(records)
}
