/// Shared types for the ranking engine.
///
/// Items are identified by caller-provided `i64` IDs. The engine never
/// invents IDs of its own — catalog import assigns them.

/// Caller-provided item identifier.
pub type ItemId = i64;

/// Canonical order-independent key for a compared pair (smaller ID first).
/// `pair_key(a, b) == pair_key(b, a)`, so repeat detection ignores draw order.
pub fn pair_key(a: ItemId, b: ItemId) -> (ItemId, ItemId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// One catalog entry as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    pub id: ItemId,
    pub title: String,
    /// Status label from the external catalog (e.g. "completed", "dropped").
    pub status: Option<String>,
    /// Pre-existing external score. Only 1..=10 counts as scored;
    /// 0 or absent means "no score".
    pub external_score: Option<u8>,
}

impl CatalogEntry {
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        CatalogEntry {
            id,
            title: title.into(),
            status: None,
            external_score: None,
        }
    }

    /// The external score if it is a usable 1..=10 value.
    pub fn valid_score(&self) -> Option<u8> {
        self.external_score.filter(|s| (1..=10).contains(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        assert_eq!(pair_key(3, 7), pair_key(7, 3));
        assert_eq!(pair_key(3, 7), (3, 7));
    }

    #[test]
    fn test_valid_score_filters_out_of_range() {
        let mut entry = CatalogEntry::new(1, "Planetes");
        assert_eq!(entry.valid_score(), None);

        entry.external_score = Some(0);
        assert_eq!(entry.valid_score(), None);

        entry.external_score = Some(11);
        assert_eq!(entry.valid_score(), None);

        entry.external_score = Some(7);
        assert_eq!(entry.valid_score(), Some(7));
    }
}
