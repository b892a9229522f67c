use std::collections::HashMap;

/// Clamp into `[0, 1]`; non-finite values collapse to `fallback`.
pub(crate) fn unit_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// Clamp into `[lo, hi]`; non-finite values collapse to the in-range value nearest 0.
pub(crate) fn clamp_finite(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_finite() {
        v.clamp(lo, hi)
    } else {
        0.0_f64.clamp(lo, hi)
    }
}

/// Exponential moving average step: `prev + alpha * (sample - prev)`.
pub(crate) fn ema(prev: f64, sample: f64, alpha: f64) -> f64 {
    prev + alpha * (sample - prev)
}

/// Trapezoid band score.
///
/// 1.0 inside `[lo, hi]`, falling linearly to 0 at `lo - fall_below` and `hi + fall_above`.
pub(crate) fn band_score(v: f64, lo: f64, hi: f64, fall_below: f64, fall_above: f64) -> f64 {
    if v < lo {
        if fall_below <= 0.0 {
            return 0.0;
        }
        (1.0 - (lo - v) / fall_below).clamp(0.0, 1.0)
    } else if v > hi {
        if fall_above <= 0.0 {
            return 0.0;
        }
        (1.0 - (v - hi) / fall_above).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

pub(crate) fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Population variance.
pub(crate) fn variance(xs: &[f64]) -> Option<f64> {
    let m = mean(xs)?;
    Some(xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / xs.len() as f64)
}

/// Shannon entropy of the label distribution, normalized by `log2(vocab_size)`.
///
/// Returns 0 for an empty sample or a vocabulary of one label.
pub(crate) fn normalized_label_entropy<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    vocab_size: usize,
) -> f64 {
    if vocab_size < 2 {
        return 0.0;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total = 0usize;
    for l in labels {
        *counts.entry(l).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let h: f64 = counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum();
    (h / (vocab_size as f64).log2()).clamp(0.0, 1.0)
}

/// Fraction of consecutive pairs whose labels differ.
pub(crate) fn switch_rate<'a>(labels: impl IntoIterator<Item = &'a str>) -> f64 {
    let mut prev: Option<&str> = None;
    let mut pairs = 0usize;
    let mut switches = 0usize;
    for l in labels {
        if let Some(p) = prev {
            pairs += 1;
            if p != l {
                switches += 1;
            }
        }
        prev = Some(l);
    }
    if pairs == 0 {
        0.0
    } else {
        switches as f64 / pairs as f64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
