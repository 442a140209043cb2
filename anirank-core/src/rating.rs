/// Elo rating store.
///
/// Session state is a value: `record_outcome` returns a new `EloState`
/// instead of mutating in place, so a prior state can be read (or kept for
/// undo) while the next one is computed.
use std::collections::{HashMap, HashSet};

use crate::error::{RankError, Result};
use crate::types::{pair_key, ItemId};

/// Rating every item starts a session with.
pub const DEFAULT_INITIAL_RATING: f64 = 1500.0;

/// Default Elo k-factor. Typical configurations range from 1 to 200.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Per-item rating with game bookkeeping. `games == wins + losses + ties`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rating {
    pub value: f64,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Rating {
    fn new(value: f64) -> Self {
        Rating { value, games: 0, wins: 0, losses: 0, ties: 0 }
    }
}

/// Expected score of the first player against the second.
/// `expected_score(a, b) + expected_score(b, a) == 1`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / 400.0))
}

/// Full session state: ratings for a fixed item set plus comparison history.
///
/// The item-ID set is fixed at creation — no additions or removals
/// mid-session. Replacing the catalog means building a fresh state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EloState {
    ratings: HashMap<ItemId, Rating>,
    pair_history: HashSet<(ItemId, ItemId)>,
    pub comparisons: u32,
    pub skips: u32,
    pub k_factor: f64,
    pub initial_rating: f64,
}

impl EloState {
    pub fn new(item_ids: &[ItemId], k_factor: f64) -> Self {
        Self::with_initial_rating(item_ids, k_factor, DEFAULT_INITIAL_RATING)
    }

    pub fn with_initial_rating(item_ids: &[ItemId], k_factor: f64, initial_rating: f64) -> Self {
        let ratings = item_ids
            .iter()
            .map(|&id| (id, Rating::new(initial_rating)))
            .collect();
        EloState {
            ratings,
            pair_history: HashSet::new(),
            comparisons: 0,
            skips: 0,
            k_factor,
            initial_rating,
        }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn rating(&self, id: ItemId) -> Option<&Rating> {
        self.ratings.get(&id)
    }

    /// Current rating value, or the session's initial rating for unknown IDs.
    pub fn rating_value(&self, id: ItemId) -> f64 {
        self.ratings.get(&id).map_or(self.initial_rating, |r| r.value)
    }

    /// Completed games for an item. Unknown IDs have played nothing.
    pub fn games(&self, id: ItemId) -> u32 {
        self.ratings.get(&id).map_or(0, |r| r.games)
    }

    /// Whether this unordered pair has already been compared.
    pub fn has_played(&self, a: ItemId, b: ItemId) -> bool {
        self.pair_history.contains(&pair_key(a, b))
    }

    /// Apply one comparison outcome and return the updated state.
    ///
    /// `outcome_for_a` is from `a`'s perspective: 1 win, 0.5 tie, 0 loss.
    /// Both items receive the standard Elo update with the shared k-factor,
    /// the canonical pair key is recorded, and `comparisons` advances by one.
    pub fn record_outcome(&self, a: ItemId, b: ItemId, outcome_for_a: f64) -> Result<EloState> {
        if a == b {
            return Err(RankError::InvalidPair(a));
        }
        if outcome_for_a != 0.0 && outcome_for_a != 0.5 && outcome_for_a != 1.0 {
            return Err(RankError::InvalidOutcome(outcome_for_a));
        }
        let ra = self.ratings.get(&a).ok_or(RankError::UnknownItem(a))?.clone();
        let rb = self.ratings.get(&b).ok_or(RankError::UnknownItem(b))?.clone();

        let expected_a = expected_score(ra.value, rb.value);
        let expected_b = 1.0 - expected_a;
        let outcome_for_b = 1.0 - outcome_for_a;

        let mut next = self.clone();
        {
            let entry_a = next.ratings.get_mut(&a).expect("checked above");
            entry_a.value = ra.value + self.k_factor * (outcome_for_a - expected_a);
            entry_a.games += 1;
            if outcome_for_a == 1.0 {
                entry_a.wins += 1;
            } else if outcome_for_a == 0.0 {
                entry_a.losses += 1;
            } else {
                entry_a.ties += 1;
            }
        }
        {
            let entry_b = next.ratings.get_mut(&b).expect("checked above");
            entry_b.value = rb.value + self.k_factor * (outcome_for_b - expected_b);
            entry_b.games += 1;
            if outcome_for_a == 1.0 {
                entry_b.losses += 1;
            } else if outcome_for_a == 0.0 {
                entry_b.wins += 1;
            } else {
                entry_b.ties += 1;
            }
        }
        next.pair_history.insert(pair_key(a, b));
        next.comparisons += 1;
        Ok(next)
    }

    /// Record that the user skipped a presented pair. Ratings and pair
    /// history are untouched — a skipped pair may come up again.
    pub fn record_skip(&self) -> EloState {
        let mut next = self.clone();
        next.skips += 1;
        next
    }

    /// Rating values in the order of the given IDs (for distribution fitting).
    pub fn rating_values(&self, item_ids: &[ItemId]) -> Vec<f64> {
        item_ids.iter().map(|&id| self.rating_value(id)).collect()
    }
}
