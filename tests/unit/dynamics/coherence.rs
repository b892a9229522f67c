use super::*;

#[test]
fn history_is_bounded() {
    let mut t = CoherenceTracker::new(30);
    for i in 0..100 {
        t.record(f64::from(i) / 100.0, 0.2);
    }
    assert_eq!(t.len(), 30);
    assert!((t.samples()[0] - 0.70).abs() < 1e-12);
}

#[test]
fn settled_needs_enough_samples() {
    let mut t = CoherenceTracker::new(30);
    for _ in 0..19 {
        t.record(0.9, 0.2);
    }
    assert!(!t.settled(20, 10, 0.7, 0.01));
    t.record(0.9, 0.2);
    assert!(t.settled(20, 10, 0.7, 0.01));
}

#[test]
fn settled_rejects_noisy_or_low() {
    let mut noisy = CoherenceTracker::new(30);
    for i in 0..30 {
        noisy.record(if i % 2 == 0 { 0.99 } else { 0.6 }, 0.2);
    }
    assert!(!noisy.settled(20, 10, 0.7, 0.01));

    let mut low = CoherenceTracker::new(30);
    for _ in 0..30 {
        low.record(0.65, 0.2);
    }
    assert!(!low.settled(20, 10, 0.7, 0.01));
}

#[test]
fn velocity_follows_direction_and_decays_when_flat() {
    let mut t = CoherenceTracker::new(30);
    for i in 0..10 {
        t.record(0.3 + 0.05 * f64::from(i), 0.2);
    }
    assert!(t.velocity() > 0.0);
    for _ in 0..60 {
        t.record(0.75, 0.2);
    }
    assert!(t.velocity().abs() < 0.02);
}

#[test]
fn restore_drops_garbage() {
    let t = CoherenceTracker::restore(5, &[0.1, f64::NAN, 2.0, 0.3], f64::INFINITY);
    assert_eq!(t.samples(), vec![0.1, 1.0, 0.3]);
    assert_eq!(t.velocity(), 0.0);
    assert!((t.recent_mean(2).unwrap() - 0.65).abs() < 1e-12);
}
