/// Session planning: how many comparisons a catalog of a given size needs.
use crate::types::ItemId;

/// Average games per item backing each target tier.
const MINIMUM_AVG_GAMES: f64 = 2.0;
const OPTIMAL_AVG_GAMES: f64 = 4.0;
const EXCESSIVE_AVG_GAMES: f64 = 7.0;

/// Recommended total comparison counts for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonTargets {
    pub minimum: u32,
    pub optimal: u32,
    pub excessive: u32,
}

/// Compute comparison targets for `item_count` items under a scale factor.
///
/// Each tier is `max(1, round(avg_games * n / 2 * scale))` — dividing by 2
/// converts average games per item into total comparisons, since every
/// comparison advances two items' game counts. Zero items or a non-positive
/// scale yields all-zero targets.
pub fn comparison_targets(item_count: usize, scale: f64) -> ComparisonTargets {
    if item_count == 0 || scale <= 0.0 {
        return ComparisonTargets { minimum: 0, optimal: 0, excessive: 0 };
    }
    let target = |avg_games: f64| -> u32 {
        (avg_games * item_count as f64 / 2.0 * scale).round().max(1.0) as u32
    };
    ComparisonTargets {
        minimum: target(MINIMUM_AVG_GAMES),
        optimal: target(OPTIMAL_AVG_GAMES),
        excessive: target(EXCESSIVE_AVG_GAMES),
    }
}

/// Scale adjustment from the external-score distribution's normality.
///
/// `clamp(1.2 − 0.9 * normality, 0.35, 1.2)`: a catalog whose scores
/// already look normal needs proportionally fewer comparisons to calibrate;
/// a skewed or degenerate distribution needs more, up to the ceiling.
pub fn normality_multiplier(normality: f64) -> f64 {
    (1.2 - 0.9 * normality).clamp(0.35, 1.2)
}

/// Fraction of all possible unordered pairs still legal under the supplied
/// predicate. With fewer than two items there is nothing to exclude.
pub fn pair_exclusion_scale(item_ids: &[ItemId], allowed: &dyn Fn(ItemId, ItemId) -> bool) -> f64 {
    let n = item_ids.len();
    if n < 2 {
        return 1.0;
    }
    let mut total = 0u64;
    let mut legal = 0u64;
    for (i, &a) in item_ids.iter().enumerate() {
        for &b in &item_ids[i + 1..] {
            total += 1;
            if allowed(a, b) {
                legal += 1;
            }
        }
    }
    legal as f64 / total as f64
}
