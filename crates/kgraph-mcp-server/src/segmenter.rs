//! C4 — path segmentation (spec §4.1.2, §4.1.3, T5).
//!
//! Chunks a long graph-traversal path into fixed-size, overlapping segments
//! so an LLM consumer isn't handed one giant unreadable node list. Pure and
//! total: no I/O, no panics on empty input.

const SEGMENT_HOPS: usize = 5;

/// One readable chunk of a traversal path. `nodes` includes the boundary
/// node shared with the following segment (the "one-node overlap" of T5),
/// so `nodes.len() == relationship_count + 1` for every segment but the
/// concatenation still needs that boundary deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment<T> {
    pub nodes: Vec<T>,
    pub relationship_count: usize,
}

/// Splits `nodes` (a path of `nodes.len() - 1` hops) into segments of
/// exactly 5 relationships each, the last possibly shorter. Segmentation is
/// only meaningful for `hops > 5` (§4.1.2); shorter paths come back as a
/// single segment so callers can apply this unconditionally.
pub fn segment_path<T: Clone>(nodes: &[T]) -> Vec<PathSegment<T>> {
    if nodes.len() < 2 {
        return vec![PathSegment {
            nodes: nodes.to_vec(),
            relationship_count: 0,
        }];
    }

    let hops = nodes.len() - 1;
    if hops <= SEGMENT_HOPS {
        return vec![PathSegment {
            nodes: nodes.to_vec(),
            relationship_count: hops,
        }];
    }

    let mut segments = Vec::with_capacity(hops.div_ceil(SEGMENT_HOPS));
    let mut start = 0;
    while start < hops {
        let end = (start + SEGMENT_HOPS).min(hops);
        segments.push(PathSegment {
            nodes: nodes[start..=end].to_vec(),
            relationship_count: end - start,
        });
        start = end;
    }
    segments
}

/// Reassembles the original node list from segments, deduplicating the
/// one-node overlap between adjacent segments (T5's round-trip property).
pub fn reassemble<T: Clone>(segments: &[PathSegment<T>]) -> Vec<T> {
    let mut nodes = Vec::new();
    for segment in segments {
        if nodes.is_empty() {
            nodes.extend(segment.nodes.iter().cloned());
        } else {
            nodes.extend(segment.nodes.iter().skip(1).cloned());
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("n{i}")).collect()
    }

    #[test]
    fn short_path_is_a_single_segment() {
        let path = nodes(6); // hops = 5, not > 5
        let segments = segment_path(&path);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].relationship_count, 5);
    }

    #[test]
    fn eleven_hop_path_splits_into_three_segments_per_scenario_3() {
        let path = nodes(12); // hops = 11
        let segments = segment_path(&path);
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments.iter().map(|s| s.relationship_count).collect::<Vec<_>>(),
            vec![5, 5, 1]
        );
        assert_eq!(segments.iter().map(|s| s.nodes.len()).collect::<Vec<_>>(), vec![6, 6, 2]);
    }

    #[test]
    fn reassembly_round_trips_for_any_hop_count() {
        for n in [2, 6, 7, 12, 23, 31] {
            let path = nodes(n);
            let segments = segment_path(&path);
            assert_eq!(reassemble(&segments), path, "failed for {n} nodes");
        }
    }

    #[test]
    fn every_segment_but_the_last_has_exactly_five_relationships() {
        let path = nodes(23); // hops = 22 -> 5,5,5,5,2
        let segments = segment_path(&path);
        for segment in &segments[..segments.len() - 1] {
            assert_eq!(segment.relationship_count, 5);
        }
        assert!(segments.last().unwrap().relationship_count <= 5);
    }
}
