//! Collapse pairs that describe the same physical target.
//!
//! The same target is typically found several times per frame: once per
//! color profile, and once per combination of near-identical rectangles.

use hatch_vision_core::TargetPair;
use log::debug;

/// Two pairs are the same target when their midpoints are closer than `threshold`.
#[inline]
pub fn is_same_target(a: &TargetPair, b: &TargetPair, threshold: f64) -> bool {
    (a.midpoint() - b.midpoint()).abs() < threshold
}

/// Greedy clustering seeded by list order.
///
/// The first remaining pair becomes a representative, every other pair within
/// `threshold` of it is dropped, and the same step runs again on what is left
/// until nothing remains. Only representatives survive, in input order.
///
/// The result depends on the input order when pairs form a chain whose
/// neighbors are close but whose ends are not: `[0, 8, 16]` keeps `0` and `16`,
/// while `[8, 0, 16]` keeps only `8`.
pub fn merge_duplicates(pairs: Vec<TargetPair>, threshold: f64) -> Vec<TargetPair> {
    if pairs.len() < 2 {
        return pairs;
    }

    let total = pairs.len();
    let mut remaining = pairs;
    let mut kept = Vec::new();
    while !remaining.is_empty() {
        let representative = remaining.remove(0);
        remaining.retain(|p| !is_same_target(&representative, p, threshold));
        kept.push(representative);
    }

    debug!("{} of {} pairs left after merging duplicates", kept.len(), total);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatch_vision_core::OrientedRect;
    use nalgebra::Point2;

    /// Pair whose midpoint sits at `mid`.
    fn pair_at(mid: f64) -> TargetPair {
        let rect = |x: f64| OrientedRect::new(Point2::new(x, 100.0), 8.0, 40.0, -30.0);
        TargetPair::new(rect(mid - 50.0), rect(mid + 50.0))
    }

    fn midpoints(pairs: &[TargetPair]) -> Vec<f64> {
        pairs.iter().map(TargetPair::midpoint).collect()
    }

    #[test]
    fn collapses_near_identical_pairs() {
        let pairs = vec![pair_at(500.0), pair_at(503.0), pair_at(800.0), pair_at(497.5)];
        let merged = merge_duplicates(pairs, 10.0);
        assert_eq!(midpoints(&merged), vec![500.0, 800.0]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let merged = merge_duplicates(vec![pair_at(500.0), pair_at(510.0)], 10.0);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn chains_are_split_by_list_order() {
        let forward = merge_duplicates(vec![pair_at(100.0), pair_at(108.0), pair_at(116.0)], 10.0);
        assert_eq!(midpoints(&forward), vec![100.0, 116.0]);

        let seeded_in_middle =
            merge_duplicates(vec![pair_at(108.0), pair_at(100.0), pair_at(116.0)], 10.0);
        assert_eq!(midpoints(&seeded_in_middle), vec![108.0]);
    }

    #[test]
    fn duplicates_behind_a_distinct_leader_still_merge() {
        let merged = merge_duplicates(vec![pair_at(100.0), pair_at(300.0), pair_at(305.0)], 10.0);
        assert_eq!(midpoints(&merged), vec![100.0, 300.0]);
    }

    #[test]
    fn merging_is_idempotent() {
        let inputs = vec![
            vec![pair_at(100.0), pair_at(108.0), pair_at(116.0), pair_at(124.0)],
            vec![pair_at(300.0), pair_at(100.0), pair_at(305.0), pair_at(96.0)],
            vec![pair_at(10.0)],
            Vec::new(),
        ];
        for pairs in inputs {
            let once = merge_duplicates(pairs, 10.0);
            let twice = merge_duplicates(once.clone(), 10.0);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn survivors_are_pairwise_separated() {
        let pairs: Vec<TargetPair> = [0.0, 4.0, 9.0, 13.0, 18.0, 30.0, 31.0]
            .into_iter()
            .map(pair_at)
            .collect();
        let merged = merge_duplicates(pairs, 10.0);
        for (i, a) in merged.iter().enumerate() {
            for b in &merged[i + 1..] {
                assert!(!is_same_target(a, b, 10.0));
            }
        }
    }
}
