/// Blending and final result building.
///
/// Converts raw Elo ratings into calibrated 1–10 scores by blending the
/// ranking-derived percentile with the external-score percentile, weighted
/// by how complete the session is and how much the external distribution
/// deserves trust.
use crate::distribution::{percentile, score_from_percentile, NormalFit};
use crate::rating::EloState;
use crate::types::{CatalogEntry, ItemId};

/// Inputs to the blending step, computed once per scoring pass.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlendParams {
    /// Normality of the external-score distribution, `[0, 1]`.
    pub normality: f64,
    /// Comparisons recorded over the session's target, `[0, 1]`.
    pub completion_ratio: f64,
    /// Normal fit over the valid external scores.
    pub external_fit: NormalFit,
    pub total_comparisons: u32,
    pub item_count: usize,
}

/// Global trust in the earned ranking versus the external score.
///
/// `ratio ^ (1 + (1 − normality))`: zero at no completion (trust the
/// external score fully), one at full completion regardless of normality,
/// and in between a more normal external distribution (exponent nearer 1)
/// lets trust in the ranking rise faster.
pub fn compute_elo_weight(completion_ratio: f64, normality: f64) -> f64 {
    let ratio = completion_ratio.clamp(0.0, 1.0);
    let normality = normality.clamp(0.0, 1.0);
    ratio.powf(1.0 + (1.0 - normality))
}

/// One row of the final ranked output. Derived data, never mutated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultRow {
    pub rank: usize,
    pub id: ItemId,
    pub title: String,
    pub status: Option<String>,
    pub external_score: Option<u8>,
    pub elo_value: f64,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// Blended, shifted percentile in `[0, 1]`.
    pub percentile: f64,
    /// Final calibrated score.
    pub score: u8,
}

/// Options for `build_results`.
#[derive(Default)]
pub struct ResultOptions<'a> {
    /// Global calibration offset added to every blended percentile.
    pub percentile_shift: f64,
    /// Blending inputs. `None` ranks purely by Elo percentile.
    pub blending: Option<BlendParams>,
    /// Status tier for sorting: lower tiers rank above higher ones
    /// regardless of percentile (e.g. dropped items sort after everything
    /// else under the ordering assumption). `None` means a single tier.
    pub tier_of: Option<&'a dyn Fn(&CatalogEntry) -> u32>,
}

/// Build the ranked result table.
///
/// Per item: Elo percentile under `final_fit`, optionally blended with the
/// external-score percentile (weighted by global trust times per-item
/// confidence), shifted, clamped, tier-sorted, and scored.
pub fn build_results(
    entries: &[CatalogEntry],
    state: &EloState,
    final_fit: &NormalFit,
    options: &ResultOptions<'_>,
) -> Vec<ResultRow> {
    let global_weight = options
        .blending
        .as_ref()
        .map(|b| compute_elo_weight(b.completion_ratio, b.normality));

    let mut rows: Vec<(u32, ResultRow)> = entries
        .iter()
        .map(|entry| {
            let elo_value = state.rating_value(entry.id);
            let (games, wins, losses, ties) = match state.rating(entry.id) {
                Some(r) => (r.games, r.wins, r.losses, r.ties),
                None => (0, 0, 0, 0),
            };
            let elo_percentile = percentile(elo_value, final_fit);

            let blended = match (&options.blending, entry.valid_score()) {
                (Some(blend), Some(score)) => {
                    let external_percentile = if blend.external_fit.sigma <= 0.0 {
                        // Degenerate fit: fall back to a linear 1..10 mapping.
                        (score as f64 - 1.0) / 9.0
                    } else {
                        percentile(score as f64, &blend.external_fit)
                    };
                    let weight = global_weight.unwrap_or(0.0) * item_confidence(blend, games);
                    weight * elo_percentile + (1.0 - weight) * external_percentile
                }
                _ => elo_percentile,
            };

            let shifted = (blended + options.percentile_shift).clamp(0.0, 1.0);
            let tier = options.tier_of.map_or(0, |f| f(entry));
            let row = ResultRow {
                rank: 0,
                id: entry.id,
                title: entry.title.clone(),
                status: entry.status.clone(),
                external_score: entry.valid_score(),
                elo_value,
                games,
                wins,
                losses,
                ties,
                percentile: shifted,
                score: score_from_percentile(shifted),
            };
            (tier, row)
        })
        .collect();

    // Tier first, then percentile descending. Stable sort keeps input order
    // for exact ties.
    rows.sort_by(|(tier_a, row_a), (tier_b, row_b)| {
        tier_a.cmp(tier_b).then(
            row_b
                .percentile
                .partial_cmp(&row_a.percentile)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    rows.into_iter()
        .enumerate()
        .map(|(i, (_, mut row))| {
            row.rank = i + 1;
            row
        })
        .collect()
}

/// How much this particular item's rating has earned: `1 − e^(−games / expected)`,
/// where the expected games per item is `total_comparisons * 2 / item_count`
/// (each comparison advances two items).
fn item_confidence(blend: &BlendParams, games: u32) -> f64 {
    if blend.item_count == 0 {
        return 0.0;
    }
    let expected = blend.total_comparisons as f64 * 2.0 / blend.item_count as f64;
    if expected <= 0.0 {
        return 0.0;
    }
    1.0 - (-(games as f64) / expected).exp()
}

/// Solve for the percentile shift that brings the mean final score to
/// `target_mean`, by bisection. The mean score is non-decreasing in the
/// shift, so the search is monotone; the result lands within the discrete
/// scoring's resolution of the target (exact hits are not always possible).
pub fn solve_percentile_shift(
    entries: &[CatalogEntry],
    state: &EloState,
    final_fit: &NormalFit,
    blending: Option<&BlendParams>,
    target_mean: f64,
) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let mean_for = |shift: f64| -> f64 {
        let options = ResultOptions {
            percentile_shift: shift,
            blending: blending.cloned(),
            tier_of: None,
        };
        let rows = build_results(entries, state, final_fit, &options);
        rows.iter().map(|r| r.score as f64).sum::<f64>() / rows.len() as f64
    };

    let (mut lo, mut hi) = (-1.0, 1.0);
    for _ in 0..48 {
        let mid = 0.5 * (lo + hi);
        if mean_for(mid) < target_mean {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::fit_normal;

    fn entry(id: ItemId, title: &str, score: Option<u8>) -> CatalogEntry {
        CatalogEntry {
            id,
            title: title.to_string(),
            status: None,
            external_score: score,
        }
    }

    fn played_state(ids: &[ItemId]) -> EloState {
        // Item order encodes strength: earlier items beat later ones.
        let mut state = EloState::new(ids, 32.0);
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                state = state.record_outcome(a, b, 1.0).unwrap();
            }
        }
        state
    }

    #[test]
    fn test_elo_weight_endpoints() {
        for normality in [0.0, 0.3, 0.7, 1.0] {
            assert_eq!(compute_elo_weight(0.0, normality), 0.0);
            assert_eq!(compute_elo_weight(1.0, normality), 1.0);
        }
    }

    #[test]
    fn test_elo_weight_normality_ordering() {
        for ratio in [0.2, 0.5, 0.8] {
            assert!(compute_elo_weight(ratio, 1.0) > compute_elo_weight(ratio, 0.0));
        }
    }

    #[test]
    fn test_elo_weight_clamps_inputs() {
        assert_eq!(compute_elo_weight(2.0, 0.5), 1.0);
        assert_eq!(compute_elo_weight(-1.0, 0.5), 0.0);
    }

    #[test]
    fn test_pure_elo_ranking_without_blending() {
        let ids = [1, 2, 3, 4];
        let state = played_state(&ids);
        let entries: Vec<CatalogEntry> = ids
            .iter()
            .map(|&id| entry(id, &format!("Item {}", id), None))
            .collect();
        let fit = fit_normal(&state.rating_values(&ids));

        let rows = build_results(&entries, &state, &fit, &ResultOptions::default());

        assert_eq!(rows.len(), 4);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.rank, i + 1);
        }
        // Strongest item first, percentiles descending.
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[3].id, 4);
        for pair in rows.windows(2) {
            assert!(pair[0].percentile >= pair[1].percentile);
        }
    }

    #[test]
    fn test_zero_completion_trusts_external_scores() {
        // No comparisons at all: ranking must follow external scores.
        let ids = [1, 2, 3];
        let state = EloState::new(&ids, 32.0);
        let entries = vec![
            entry(1, "low", Some(3)),
            entry(2, "high", Some(9)),
            entry(3, "mid", Some(6)),
        ];
        let external_fit = fit_normal(&[3.0, 9.0, 6.0]);
        let options = ResultOptions {
            percentile_shift: 0.0,
            blending: Some(BlendParams {
                normality: 0.5,
                completion_ratio: 0.0,
                external_fit,
                total_comparisons: 0,
                item_count: 3,
            }),
            tier_of: None,
        };
        let fit = fit_normal(&state.rating_values(&ids));
        let rows = build_results(&entries, &state, &fit, &options);

        assert_eq!(rows[0].id, 2);
        assert_eq!(rows[1].id, 3);
        assert_eq!(rows[2].id, 1);
    }

    #[test]
    fn test_unscored_item_uses_pure_elo_percentile() {
        let ids = [1, 2];
        let state = played_state(&ids);
        let entries = vec![entry(1, "scored", Some(8)), entry(2, "unscored", None)];
        let fit = fit_normal(&state.rating_values(&ids));
        let blend = BlendParams {
            normality: 0.5,
            completion_ratio: 0.5,
            external_fit: fit_normal(&[8.0]),
            total_comparisons: 1,
            item_count: 2,
        };
        let options = ResultOptions {
            percentile_shift: 0.0,
            blending: Some(blend),
            tier_of: None,
        };
        let rows = build_results(&entries, &state, &fit, &options);
        let unscored = rows.iter().find(|r| r.id == 2).unwrap();
        assert!((unscored.percentile - percentile(state.rating_value(2), &fit)).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_external_fit_linear_fallback() {
        // All external scores identical: sigma 0, so the external percentile
        // comes from the linear (score − 1) / 9 mapping.
        let ids = [1, 2];
        let state = EloState::new(&ids, 32.0);
        let entries = vec![entry(1, "a", Some(10)), entry(2, "b", Some(10))];
        let blend = BlendParams {
            normality: 0.0,
            completion_ratio: 0.0,
            external_fit: fit_normal(&[10.0, 10.0]),
            total_comparisons: 0,
            item_count: 2,
        };
        let options = ResultOptions {
            percentile_shift: 0.0,
            blending: Some(blend),
            tier_of: None,
        };
        let fit = fit_normal(&state.rating_values(&ids));
        let rows = build_results(&entries, &state, &fit, &options);
        for row in rows {
            assert!((row.percentile - 1.0).abs() < 1e-12);
            assert_eq!(row.score, 10);
        }
    }

    #[test]
    fn test_status_tier_demotes_regardless_of_percentile() {
        let ids = [1, 2, 3];
        let state = played_state(&ids); // item 1 strongest
        let mut entries: Vec<CatalogEntry> = ids
            .iter()
            .map(|&id| entry(id, &format!("Item {}", id), None))
            .collect();
        entries[0].status = Some("dropped".to_string());

        let demote_dropped =
            |e: &CatalogEntry| u32::from(e.status.as_deref() == Some("dropped"));
        let options = ResultOptions {
            percentile_shift: 0.0,
            blending: None,
            tier_of: Some(&demote_dropped),
        };
        let fit = fit_normal(&state.rating_values(&ids));
        let rows = build_results(&entries, &state, &fit, &options);

        // The strongest item sorts last because of its tier.
        assert_eq!(rows[2].id, 1);
        assert_eq!(rows[0].id, 2);
    }

    #[test]
    fn test_percentile_shift_applied_and_clamped() {
        let ids = [1, 2];
        let state = played_state(&ids);
        let entries: Vec<CatalogEntry> =
            ids.iter().map(|&id| entry(id, "x", None)).collect();
        let fit = fit_normal(&state.rating_values(&ids));

        let options = ResultOptions {
            percentile_shift: 2.0,
            ..ResultOptions::default()
        };
        let rows = build_results(&entries, &state, &fit, &options);
        for row in rows {
            assert_eq!(row.percentile, 1.0);
            assert_eq!(row.score, 10);
        }
    }

    #[test]
    fn test_solve_percentile_shift_hits_target() {
        let ids: Vec<ItemId> = (1..=20).collect();
        let state = played_state(&ids);
        let entries: Vec<CatalogEntry> = ids
            .iter()
            .map(|&id| entry(id, &format!("Item {}", id), None))
            .collect();
        let fit = fit_normal(&state.rating_values(&ids));

        let target = 7.0;
        let shift = solve_percentile_shift(&entries, &state, &fit, None, target);
        let options = ResultOptions {
            percentile_shift: shift,
            ..ResultOptions::default()
        };
        let rows = build_results(&entries, &state, &fit, &options);
        let mean = rows.iter().map(|r| r.score as f64).sum::<f64>() / rows.len() as f64;
        // Scores are discrete; the mean can only land within half a bucket.
        assert!((mean - target).abs() <= 0.5, "mean {} vs target {}", mean, target);
    }

    #[test]
    fn test_empty_entries() {
        let state = EloState::new(&[], 32.0);
        let rows = build_results(&[], &state, &NormalFit::DEGENERATE, &ResultOptions::default());
        assert!(rows.is_empty());
        assert_eq!(
            solve_percentile_shift(&[], &state, &NormalFit::DEGENERATE, None, 7.0),
            0.0
        );
    }
}
