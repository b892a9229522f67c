use super::*;

#[test]
fn band_score_is_flat_inside_and_ramps_outside() {
    assert_eq!(band_score(0.1, 0.05, 0.25, 0.05, 0.25), 1.0);
    assert_eq!(band_score(0.0, 0.05, 0.25, 0.05, 0.25), 0.0);
    assert!((band_score(0.025, 0.05, 0.25, 0.05, 0.25) - 0.5).abs() < 1e-12);
    assert!((band_score(0.375, 0.05, 0.25, 0.05, 0.25) - 0.5).abs() < 1e-12);
    assert_eq!(band_score(0.9, 0.05, 0.25, 0.05, 0.25), 0.0);
}

#[test]
fn entropy_of_single_label_is_zero() {
    let labels = ["dot"; 10];
    assert_eq!(normalized_label_entropy(labels.iter().copied(), 5), 0.0);
}

#[test]
fn entropy_of_uniform_full_vocab_is_one() {
    let labels = ["a", "b", "c", "d"];
    let h = normalized_label_entropy(labels.iter().copied(), 4);
    assert!((h - 1.0).abs() < 1e-12);
}

#[test]
fn entropy_degenerate_vocab_is_zero() {
    assert_eq!(normalized_label_entropy(["a", "b"].iter().copied(), 1), 0.0);
    assert_eq!(normalized_label_entropy(std::iter::empty(), 5), 0.0);
}

#[test]
fn switch_rate_counts_changes_between_neighbours() {
    assert_eq!(switch_rate(["a"].iter().copied()), 0.0);
    assert_eq!(switch_rate(["a", "a", "a"].iter().copied()), 0.0);
    assert_eq!(switch_rate(["a", "b", "a"].iter().copied()), 1.0);
    assert!((switch_rate(["a", "a", "b"].iter().copied()) - 0.5).abs() < 1e-12);
}

#[test]
fn mean_and_variance() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[1.0, 3.0]), Some(2.0));
    assert_eq!(variance(&[2.0, 2.0, 2.0]), Some(0.0));
    assert_eq!(variance(&[1.0, 3.0]), Some(1.0));
}

#[test]
fn unit_or_sanitizes() {
    assert_eq!(unit_or(f64::NAN, 0.5), 0.5);
    assert_eq!(unit_or(1.5, 0.5), 1.0);
    assert_eq!(clamp_finite(f64::INFINITY, 0.001, 2.0), 0.001);
    assert_eq!(clamp_finite(f64::NAN, -2.0, 2.0), 0.0);
}
