use super::*;

#[test]
fn manual_clock_clones_share_time() {
    let a = ManualClock::new(100.0);
    let b = a.clone();
    a.advance(5.5);
    assert_eq!(b.now(), 105.5);
    b.set(1.0);
    assert_eq!(a.now(), 1.0);
}

#[test]
fn elapsed_rejects_backwards_clock() {
    assert_eq!(elapsed_secs(10.0, 15.0), Some(5.0));
    assert_eq!(elapsed_secs(10.0, 10.0), Some(0.0));
    assert_eq!(elapsed_secs(10.0, 5.0), None);
    assert_eq!(elapsed_secs(f64::NAN, 5.0), None);
}

#[test]
fn long_gaps_are_measured_not_collapsed() {
    let hours = 6.0 * 3600.0;
    assert_eq!(elapsed_secs(1_000.0, 1_000.0 + hours), Some(hours));
}

#[test]
fn system_clock_is_past_2020() {
    assert!(SystemClock.now() > 1_577_836_800.0);
}
