//! Numeric helpers over snapshot history.

use crate::domain::snapshot::Snapshot;

/// History sorted oldest first.
pub(crate) fn chronological(history: &[Snapshot]) -> Vec<&Snapshot> {
    let mut sorted: Vec<&Snapshot> = history.iter().collect();
    sorted.sort_by_key(|s| s.timestamp);
    sorted
}

/// The last `n` elements (all of them when shorter).
pub(crate) fn tail<T>(values: &[T], n: usize) -> &[T] {
    &values[values.len().saturating_sub(n)..]
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Format a fraction as a percentage with two decimals.
pub(crate) fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Two-tailed p-value of a standard normal z-score.
pub(crate) fn two_tailed_p(z: f64) -> f64 {
    erfc(z.abs() / std::f64::consts::SQRT_2)
}

// Abramowitz and Stegun 7.1.26, absolute error below 1.5e-7.
fn erfc(x: f64) -> f64 {
    const P: f64 = 0.327_591_1;
    const A: [f64; 5] = [
        0.254_829_592,
        -0.284_496_736,
        1.421_413_741,
        -1.453_152_027,
        1.061_405_429,
    ];
    let sign = x.is_sign_negative();
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = A.iter().rev().fold(0.0, |acc, a| acc * t + a) * t;
    let value = poly * (-x * x).exp();
    if sign {
        2.0 - value
    } else {
        value
    }
}
