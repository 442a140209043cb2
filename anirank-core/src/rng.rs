/// Deterministic random source for pair sampling.
///
/// A multiplicative linear-congruential generator (MINSTD: modulus 2^31 − 1,
/// multiplier 48271), threaded explicitly through every call that needs
/// randomness. Same seed ⇒ identical sequence, which makes whole sessions
/// replayable.

const MODULUS: i64 = 2_147_483_647; // 2^31 - 1, prime
const MULTIPLIER: i64 = 48_271;

#[derive(Debug, Clone, PartialEq)]
pub struct SeededRng {
    state: i64,
}

impl SeededRng {
    /// Create a generator from any seed. Zero and negative seeds are folded
    /// into the valid state range `[1, MODULUS − 1]` rather than rejected.
    pub fn new(seed: i64) -> Self {
        let mut state = seed.rem_euclid(MODULUS);
        if state == 0 {
            state = 1;
        }
        SeededRng { state }
    }

    /// Next value in `[0, 1)`.
    pub fn next_float(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Uniform index into `0..len`. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "next_index needs a non-empty range");
        ((self.next_float() * len as f64) as usize).min(len - 1)
    }

    /// Pick an index with probability proportional to its weight.
    ///
    /// The draw is scaled by the total weight and the first index whose
    /// cumulative weight exceeds it wins. A non-positive total falls back to
    /// a uniform index, and floating rounding at the tail falls back to the
    /// last index — a non-empty list always yields a valid index.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        debug_assert!(!weights.is_empty(), "weighted_choice needs at least one weight");
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return self.next_index(weights.len());
        }

        let draw = self.next_float() * total;
        let mut cumulative = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            cumulative += w;
            if draw < cumulative {
                return i;
            }
        }
        weights.len() - 1
    }
}
