use std::collections::BTreeMap;

/// Note values tracked by the cash ledger, highest first.
pub const DENOMINATIONS: [u32; 6] = [1000, 500, 200, 100, 50, 20];

/// Denomination the preset fills its remainder with.
const PRESET_REMAINDER_DENOMINATION: u32 = 100;

/// Counts may arrive hand-entered: negative or fractional values are clamped
/// to whole non-negative counts before multiplying.
pub fn compute_total(counts: &BTreeMap<u32, f64>) -> f64 {
    counts
        .iter()
        .map(|(denomination, count)| f64::from(*denomination) * count.floor().max(0.0))
        .sum()
}

/// Submitted keys that are not tracked note values, for rejection upstream.
pub fn unknown_denominations(counts: &BTreeMap<u32, f64>) -> Vec<u32> {
    counts
        .keys()
        .copied()
        .filter(|d| !DENOMINATIONS.contains(d))
        .collect()
}

/// Canonical count distribution for a fixed target total: five notes of each
/// of the two highest denominations, remainder kept in hundreds. A capture
/// convenience, not a change-making algorithm; it is neither minimal nor
/// exact for targets that are not multiples of 100.
pub fn preset_counts(target: f64) -> BTreeMap<u32, f64> {
    let mut counts = BTreeMap::new();
    counts.insert(DENOMINATIONS[0], 5.0);
    counts.insert(DENOMINATIONS[1], 5.0);
    let remainder = (target - compute_total(&counts)).max(0.0);
    counts.insert(
        PRESET_REMAINDER_DENOMINATION,
        (remainder / f64::from(PRESET_REMAINDER_DENOMINATION)).floor(),
    );
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn counts(pairs: &[(u32, f64)]) -> BTreeMap<u32, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn total_is_weighted_sum() {
        let c = counts(&[(1000, 5.0), (500, 5.0), (100, 25.0)]);
        assert!((compute_total(&c) - 10_000.0).abs() < EPS);
    }

    #[test]
    fn negative_and_fractional_counts_clamp() {
        let c = counts(&[(1000, -3.0), (500, 2.7), (20, 0.0)]);
        // -3 -> 0, 2.7 -> 2
        assert!((compute_total(&c) - 1000.0).abs() < EPS);
    }

    #[test]
    fn preset_matches_canonical_distribution() {
        let c = preset_counts(10_000.0);
        assert_eq!(c.get(&1000), Some(&5.0));
        assert_eq!(c.get(&500), Some(&5.0));
        assert_eq!(c.get(&100), Some(&25.0));
        assert!((compute_total(&c) - 10_000.0).abs() < EPS);
    }

    #[test]
    fn preset_below_fixed_notes_keeps_zero_hundreds() {
        let c = preset_counts(5_000.0);
        assert_eq!(c.get(&100), Some(&0.0));
    }

    #[test]
    fn untracked_denominations_are_reported() {
        let c = counts(&[(1000, 1.0), (25, 4.0), (3, 1.0)]);
        assert_eq!(unknown_denominations(&c), vec![3, 25]);
        assert!(unknown_denominations(&counts(&[(500, 2.0), (20, 1.0)])).is_empty());
    }
}
