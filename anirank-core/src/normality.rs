/// Measures how closely a 1–10 score histogram matches the normal curve
/// implied by its own fit. Feeds both the Session Planner (a skewed catalog
/// needs more comparisons) and the Blender (a skewed external distribution
/// earns less trust).
use crate::distribution::{fit_normal, normal_cdf};

/// Below this many scored samples the histogram shape is not evidence of
/// anything; normality is reported as neutral. This one rule applies at
/// every call site — degeneracy is only checked at or above the threshold.
pub const MIN_NORMALITY_SAMPLES: usize = 10;

/// Normality returned when there is not enough data to judge.
pub const NEUTRAL_NORMALITY: f64 = 0.5;

/// Estimate normality of a set of external scores (positive integers 1–10).
///
/// Returns a value in `[0, 1]`: 1 means the observed bucket frequencies
/// match the fitted normal's predictions exactly, 0 means maximal mismatch.
/// Fewer than `MIN_NORMALITY_SAMPLES` samples ⇒ `NEUTRAL_NORMALITY`; a
/// degenerate fit (all scores identical) ⇒ 0, maximally non-normal for
/// trust purposes.
pub fn estimate_normality(scores: &[u8]) -> f64 {
    if scores.len() < MIN_NORMALITY_SAMPLES {
        return NEUTRAL_NORMALITY;
    }
    let values: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
    let fit = fit_normal(&values);
    if fit.sigma <= 0.0 {
        return 0.0;
    }

    let n = values.len() as f64;
    let mut l1 = 0.0;
    for bucket in 1..=10u8 {
        let observed = scores.iter().filter(|&&s| s == bucket).count() as f64 / n;
        let predicted = bucket_probability(bucket, fit.mu, fit.sigma);
        l1 += (observed - predicted).abs();
    }
    // L1 distance between two (sub-)probability vectors lies in [0, 2].
    (1.0 - l1 / 2.0).clamp(0.0, 1.0)
}

/// Probability mass the fitted normal assigns to the half-open interval
/// `[bucket − 0.5, bucket + 0.5)`.
fn bucket_probability(bucket: u8, mu: f64, sigma: f64) -> f64 {
    let b = bucket as f64;
    normal_cdf((b + 0.5 - mu) / sigma) - normal_cdf((b - 0.5 - mu) / sigma)
}

/// Per-bucket sampling priority: how under-represented each score bucket is
/// relative to the frequency its own normal fit predicts.
///
/// `result[bucket - 1]` is in `[0, 1]`; 0 means the bucket is at or above
/// its predicted share. The Pair Sampler multiplies item base weights by
/// `1 + boost * priority`, steering attention toward starved buckets.
/// With too little data (or a degenerate fit) everything is 0 — no bucket
/// deserves special attention yet.
pub fn bucket_priorities(scores: &[u8]) -> [f64; 10] {
    let mut priorities = [0.0; 10];
    if scores.len() < MIN_NORMALITY_SAMPLES {
        return priorities;
    }
    let values: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
    let fit = fit_normal(&values);
    if fit.sigma <= 0.0 {
        return priorities;
    }

    let n = values.len() as f64;
    for bucket in 1..=10u8 {
        let observed = scores.iter().filter(|&&s| s == bucket).count() as f64 / n;
        let predicted = bucket_probability(bucket, fit.mu, fit.sigma);
        if predicted > f64::EPSILON {
            let deficit = (predicted - observed).max(0.0);
            priorities[bucket as usize - 1] = (deficit / predicted).clamp(0.0, 1.0);
        }
    }
    priorities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_samples_neutral() {
        assert_eq!(estimate_normality(&[]), NEUTRAL_NORMALITY);
        assert_eq!(estimate_normality(&[7, 8, 9]), NEUTRAL_NORMALITY);
        // Nine identical scores: still below the threshold, still neutral —
        // the degenerate branch only applies with enough data.
        assert_eq!(estimate_normality(&[5; 9]), NEUTRAL_NORMALITY);
    }

    #[test]
    fn test_identical_scores_degenerate() {
        // 20 identical scores fit with sigma 0: maximally non-normal.
        assert_eq!(estimate_normality(&[7; 20]), 0.0);
    }

    #[test]
    fn test_bell_shaped_scores_high_normality() {
        // Roughly binomial around 5-6.
        let mut scores = Vec::new();
        for (score, count) in [(2, 1), (3, 3), (4, 8), (5, 12), (6, 12), (7, 8), (8, 3), (9, 1)] {
            scores.extend(std::iter::repeat(score as u8).take(count));
        }
        let normality = estimate_normality(&scores);
        assert!(normality > 0.8, "bell-shaped data scored {}", normality);
    }

    #[test]
    fn test_bimodal_scores_low_normality() {
        let mut scores = vec![1u8; 15];
        scores.extend(std::iter::repeat(10u8).take(15));
        let normality = estimate_normality(&scores);
        assert!(normality < 0.5, "bimodal data scored {}", normality);
    }

    #[test]
    fn test_normality_in_unit_interval() {
        let samples: Vec<u8> = (0..50).map(|i| (i % 10) as u8 + 1).collect();
        let normality = estimate_normality(&samples);
        assert!((0.0..=1.0).contains(&normality));
    }

    #[test]
    fn test_priorities_zero_without_data() {
        assert_eq!(bucket_priorities(&[7, 8]), [0.0; 10]);
        assert_eq!(bucket_priorities(&[7; 20]), [0.0; 10]);
    }

    #[test]
    fn test_priorities_flag_starved_buckets() {
        // Everything piled on 5 and 6: the fitted normal predicts mass in 4
        // and 7 that is absent, so those buckets get positive priority.
        let mut scores = vec![5u8; 10];
        scores.extend(std::iter::repeat(6u8).take(10));
        let priorities = bucket_priorities(&scores);
        assert!(priorities[3] > 0.0, "bucket 4 should be starved");
        assert!(priorities[6] > 0.0, "bucket 7 should be starved");
        for p in priorities {
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
