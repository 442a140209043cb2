/// anirank-core: Pure-computation pairwise ranking and scoring engine.
///
/// Elo updates → adaptive pair sampling → normal-fit calibration → final
/// 1–10 scores. No IO, no global state — the random source is an explicit
/// seeded value, so whole sessions replay deterministically.
///
/// Items are identified by caller-provided `i64` IDs. State updates are
/// immutable: `record_outcome` returns a new `EloState`, leaving the input
/// untouched for undo or snapshotting.
///
/// # Quick start
///
/// ```rust
/// use anirank_core::{
///     build_results, fit_normal, select_pair, EloState, PairOptions, ResultOptions, SeededRng,
/// };
///
/// let item_ids = vec![100, 200, 300]; // your IDs — any i64 values
/// let mut state = EloState::new(&item_ids, 32.0);
/// let mut rng = SeededRng::new(42);
///
/// // Draw a pair, ask the user, record the outcome (1.0 = first item won).
/// let (a, b) = select_pair(&state, &item_ids, &mut rng, &PairOptions::default())
///     .unwrap()
///     .expect("pairs available");
/// state = state.record_outcome(a, b, 1.0).unwrap();
///
/// // Fit the final ratings and build the ranked table.
/// let fit = fit_normal(&state.rating_values(&item_ids));
/// let entries: Vec<_> = item_ids
///     .iter()
///     .map(|&id| anirank_core::CatalogEntry::new(id, format!("Item {id}")))
///     .collect();
/// let rows = build_results(&entries, &state, &fit, &ResultOptions::default());
/// for row in &rows {
///     println!("#{} {} — {}/10", row.rank, row.title, row.score);
/// }
/// ```
pub mod distribution;
pub mod error;
pub mod normality;
pub mod planner;
pub mod rating;
pub mod results;
pub mod rng;
pub mod sampler;
pub mod types;

// Re-export primary public API at crate root.
pub use distribution::{fit_normal, normal_cdf, percentile, score_from_percentile, NormalFit};
pub use error::{RankError, Result};
pub use normality::{bucket_priorities, estimate_normality, NEUTRAL_NORMALITY};
pub use planner::{comparison_targets, normality_multiplier, pair_exclusion_scale, ComparisonTargets};
pub use rating::{expected_score, EloState, Rating, DEFAULT_INITIAL_RATING, DEFAULT_K_FACTOR};
pub use results::{
    build_results, compute_elo_weight, solve_percentile_shift, BlendParams, ResultOptions,
    ResultRow,
};
pub use rng::SeededRng;
pub use sampler::{select_pair, PairOptions, DEFAULT_MAX_ATTEMPTS};
pub use types::{pair_key, CatalogEntry, ItemId};
