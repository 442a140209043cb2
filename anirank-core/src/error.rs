/// Error taxonomy for the ranking engine.
///
/// These are contract violations — malformed input from the caller — and
/// fail fast. Pair exhaustion is deliberately *not* here: running out of
/// legal pairs is an expected terminal condition, signalled by
/// `select_pair` returning `Ok(None)` so the caller can relax constraints
/// and continue the session.
use thiserror::Error;

use crate::types::ItemId;

pub type Result<T> = std::result::Result<T, RankError>;

#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    /// An item cannot be compared against itself.
    #[error("cannot compare item {0} against itself")]
    InvalidPair(ItemId),

    /// Outcomes are from the first item's perspective: 0 (loss), 0.5 (tie), 1 (win).
    #[error("outcome must be 0, 0.5 or 1, got {0}")]
    InvalidOutcome(f64),

    /// Pair selection needs at least two candidate items.
    #[error("need at least 2 items to select a pair, got {0}")]
    InsufficientItems(usize),

    /// The ID was not part of the item set this session was created with.
    #[error("unknown item id {0}")]
    UnknownItem(ItemId),
}
