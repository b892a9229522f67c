use rand::{SeedableRng, rngs::StdRng};

use super::*;

fn goal(w: f64, c: f64, s: f64, p: f64) -> SessionGoal {
    let mut rng = StdRng::seed_from_u64(3);
    SessionGoal::from_felt(&FeltState::new(w, c, s, p), &mut rng)
}

#[test]
fn warmth_bias_is_centered_and_scaled() {
    assert_eq!(goal(0.5, 0.5, 0.9, 0.5).warmth_bias, 0.0);
    assert!((goal(1.0, 0.5, 0.9, 0.5).warmth_bias - 0.15).abs() < 1e-12);
    assert!((goal(0.0, 0.5, 0.9, 0.5).warmth_bias + 0.15).abs() < 1e-12);
}

#[test]
fn clarity_wins_over_presence_for_coverage() {
    assert_eq!(goal(0.5, 0.9, 0.9, 0.9).coverage, CoverageTarget::Sparse);
    assert_eq!(goal(0.5, 0.5, 0.9, 0.9).coverage, CoverageTarget::Dense);
    assert_eq!(goal(0.5, 0.5, 0.9, 0.5).coverage, CoverageTarget::Moderate);
}

#[test]
fn unstable_sessions_pick_a_start_quadrant() {
    assert!(goal(0.5, 0.5, 0.2, 0.5).start_quadrant.is_some());
    assert_eq!(goal(0.5, 0.5, 0.5, 0.5).start_quadrant, None);
}

#[test]
fn start_quadrant_is_reproducible_for_a_seed() {
    assert_eq!(
        goal(0.5, 0.5, 0.1, 0.5).start_quadrant,
        goal(0.5, 0.5, 0.1, 0.5).start_quadrant
    );
}
