//! Partitions a chronologically ordered detection stream into same-scan
//! groups by a time-gap threshold.

use crate::types::Detection;

/// Group `detections` (assumed sorted non-decreasing by `t`) into
/// contiguous scans. A detection joins the current group iff its
/// timestamp is within `max_time_diff` of the group's *first* timestamp,
/// not the previous detection's — so a group can span up to
/// `max_time_diff` of wall-clock regardless of intra-group cadence.
pub fn group_detections(detections: &[Detection], max_time_diff: f64) -> Vec<Vec<Detection>> {
    let mut groups = Vec::new();
    let mut iter = detections.iter();

    let Some(first) = iter.next() else {
        return groups;
    };

    let mut base_t = first.t;
    let mut current = vec![*first];

    for d in iter {
        if d.t - base_t <= max_time_diff {
            current.push(*d);
        } else {
            groups.push(std::mem::take(&mut current));
            base_t = d.t;
            current.push(*d);
        }
    }
    groups.push(current);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(t: f64) -> Detection {
        Detection::new(1000.0, 0.0, 0.0, t)
    }

    #[test]
    fn empty_stream_yields_empty_output() {
        assert!(group_detections(&[], 0.050).is_empty());
    }

    #[test]
    fn boundary_is_inclusive() {
        let dets: Vec<Detection> = [0.000, 0.049, 0.050, 0.101].iter().map(|t| det(*t)).collect();
        let groups = group_detections(&dets, 0.050);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn base_t_is_groups_first_timestamp_not_previous() {
        // Cadence inside the group is larger than max_time_diff between
        // consecutive points, but all stay within max_time_diff of the
        // group's first timestamp.
        let dets: Vec<Detection> = [0.0, 0.03, 0.05].iter().map(|t| det(*t)).collect();
        let groups = group_detections(&dets, 0.05);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn partitions_reconstruct_input_exactly() {
        let dets: Vec<Detection> = (0..20).map(|i| det(i as f64 * 0.01)).collect();
        let groups = group_detections(&dets, 0.050);
        let flattened: Vec<Detection> = groups.into_iter().flatten().collect();
        assert_eq!(flattened, dets);
    }

    #[test]
    fn each_group_first_timestamp_spans_at_most_max_time_diff() {
        let dets: Vec<Detection> = (0..50).map(|i| det(i as f64 * 0.013)).collect();
        let groups = group_detections(&dets, 0.050);
        for g in groups {
            let base = g[0].t;
            for d in &g {
                assert!(d.t - base <= 0.050 + 1e-12);
            }
        }
    }
}
