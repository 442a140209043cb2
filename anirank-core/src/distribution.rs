/// Normal-distribution fitting and percentile/score conversion.
///
/// `sigma == 0` is a valid degenerate fit (fewer than two values, or all
/// values identical); every consumer must handle it.

/// A fitted normal distribution. Derived data — recomputed whenever needed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalFit {
    pub mu: f64,
    pub sigma: f64,
}

impl NormalFit {
    pub const DEGENERATE: NormalFit = NormalFit { mu: 0.0, sigma: 0.0 };
}

/// Fit a normal distribution: mean and *population* standard deviation
/// (divide by n, not n − 1).
pub fn fit_normal(values: &[f64]) -> NormalFit {
    match values.len() {
        0 => NormalFit::DEGENERATE,
        1 => NormalFit { mu: values[0], sigma: 0.0 },
        n => {
            let mu = values.iter().sum::<f64>() / n as f64;
            let variance = values.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>() / n as f64;
            NormalFit { mu, sigma: variance.sqrt() }
        }
    }
}

/// Error function via the Abramowitz–Stegun 7.1.26 rational approximation
/// (max absolute error ~1.5e-7). Odd symmetry is handled explicitly so
/// `erf(-x) == -erf(x)` holds exactly.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}

/// Standard normal CDF. `normal_cdf(0) == 0.5`, `normal_cdf(z) + normal_cdf(-z) == 1`.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Percentile of a value under a fit, clamped to `[0, 1]`.
/// A degenerate fit pins everything to the median.
pub fn percentile(value: f64, fit: &NormalFit) -> f64 {
    if fit.sigma <= 0.0 {
        return 0.5;
    }
    normal_cdf((value - fit.mu) / fit.sigma).clamp(0.0, 1.0)
}

/// Map a percentile to a discrete 1–10 score via ceiling decile buckets:
/// a value exactly on a decile boundary stays in the lower bucket, anything
/// above it rounds up.
pub fn score_from_percentile(p: f64) -> u8 {
    if p <= 0.0 {
        return 1;
    }
    if p >= 1.0 {
        return 10;
    }
    ((p * 10.0).ceil() as u8).clamp(1, 10)
}
