/// Adaptive pair selection.
///
/// Stateless per call but history-dependent through the `EloState`: base
/// weights starve well-covered items, the candidate pool biases toward
/// close (informative) matchups, and repeat avoidance retries a bounded
/// number of times before falling back to uniform choice over every legal
/// pair that remains.
use std::collections::HashMap;

use crate::error::{RankError, Result};
use crate::rating::EloState;
use crate::rng::SeededRng;
use crate::types::ItemId;

/// Bounded retry budget for the weighted draw before falling back to
/// legal-pair enumeration.
pub const DEFAULT_MAX_ATTEMPTS: usize = 200;

/// Upper bound on the closest-rating candidate pool per anchor. Closeness
/// weight drops off quickly with rating distance, so far-away items almost
/// never win the draw anyway.
const CANDIDATE_POOL_SIZE: usize = 60;

/// Rating-distance scale for the closeness weight `1 / (1 + |Δ| / 100)`.
const CLOSENESS_SCALE: f64 = 100.0;

/// Options for `select_pair`.
pub struct PairOptions<'a> {
    /// Skip pairs already present in the state's history.
    pub avoid_repeats: bool,
    /// Per-item priority in `[0, 1]` — how under-represented the item's
    /// external-score bucket is (see `normality::bucket_priorities`).
    pub priority: Option<&'a HashMap<ItemId, f64>>,
    /// Multiplier strength for priorities: base weight scales by
    /// `1 + priority_boost * priority`.
    pub priority_boost: f64,
    /// External scores, for the same-score matchup encouragement.
    pub external_scores: Option<&'a HashMap<ItemId, u8>>,
    /// Candidates sharing the anchor's external score get their weight
    /// scaled by `1 + same_score_boost * priority(anchor)`.
    pub same_score_boost: f64,
    /// Legality predicate from ordering assumptions (e.g. no cross-status
    /// pairs). `None` means every pair is legal.
    pub allowed: Option<&'a dyn Fn(ItemId, ItemId) -> bool>,
    pub max_attempts: usize,
}

impl Default for PairOptions<'_> {
    fn default() -> Self {
        PairOptions {
            avoid_repeats: true,
            priority: None,
            priority_boost: 1.0,
            external_scores: None,
            same_score_boost: 1.0,
            allowed: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Select the next comparison pair.
///
/// Returns `Ok(None)` when no legal pair exists under the current
/// constraints — a terminal condition for these settings, not an error.
/// Identical `(state, item_ids, options, rng seed)` always produces the
/// identical pair.
pub fn select_pair(
    state: &EloState,
    item_ids: &[ItemId],
    rng: &mut SeededRng,
    options: &PairOptions<'_>,
) -> Result<Option<(ItemId, ItemId)>> {
    if item_ids.len() < 2 {
        return Err(RankError::InsufficientItems(item_ids.len()));
    }

    let base_weight = |id: ItemId| -> f64 {
        let mut w = 1.0 / (1.0 + state.games(id) as f64);
        if let Some(priority) = options.priority {
            if let Some(&p) = priority.get(&id) {
                w *= 1.0 + options.priority_boost * p;
            }
        }
        w
    };

    let anchor_weights: Vec<f64> = item_ids.iter().map(|&id| base_weight(id)).collect();

    for _ in 0..options.max_attempts {
        let anchor = item_ids[rng.weighted_choice(&anchor_weights)];
        let anchor_rating = state.rating_value(anchor);
        let anchor_priority = options
            .priority
            .and_then(|p| p.get(&anchor).copied())
            .unwrap_or(0.0);
        let anchor_score = options.external_scores.and_then(|s| s.get(&anchor).copied());

        // Pool of the candidates rated closest to the anchor. The sort is
        // stable, so rating ties keep input order.
        let mut pool: Vec<ItemId> = item_ids.iter().copied().filter(|&id| id != anchor).collect();
        pool.sort_by(|&x, &y| {
            let dx = (state.rating_value(x) - anchor_rating).abs();
            let dy = (state.rating_value(y) - anchor_rating).abs();
            dx.partial_cmp(&dy).unwrap_or(std::cmp::Ordering::Equal)
        });
        pool.truncate(CANDIDATE_POOL_SIZE);

        let candidate_weights: Vec<f64> = pool
            .iter()
            .map(|&id| {
                let delta = (state.rating_value(id) - anchor_rating).abs();
                let mut w = 1.0 / (1.0 + delta / CLOSENESS_SCALE) * base_weight(id);
                // Same-score pairs carry little information on their own and
                // need explicit encouragement to get resolved.
                let candidate_score = options.external_scores.and_then(|s| s.get(&id).copied());
                if anchor_score.is_some() && anchor_score == candidate_score {
                    w *= 1.0 + options.same_score_boost * anchor_priority;
                }
                w
            })
            .collect();

        let candidate = pool[rng.weighted_choice(&candidate_weights)];

        if let Some(allowed) = options.allowed {
            if !allowed(anchor, candidate) {
                continue;
            }
        }
        if options.avoid_repeats && state.has_played(anchor, candidate) {
            continue;
        }
        return Ok(Some((anchor, candidate)));
    }

    // Retry budget spent: enumerate every remaining legal pair and pick
    // uniformly. Priority weighting is deliberately ignored here.
    let mut legal: Vec<(ItemId, ItemId)> = Vec::new();
    for (i, &a) in item_ids.iter().enumerate() {
        for &b in &item_ids[i + 1..] {
            if let Some(allowed) = options.allowed {
                if !allowed(a, b) {
                    continue;
                }
            }
            if options.avoid_repeats && state.has_played(a, b) {
                continue;
            }
            legal.push((a, b));
        }
    }
    if legal.is_empty() {
        return Ok(None);
    }
    Ok(Some(legal[rng.next_index(legal.len())]))
}
