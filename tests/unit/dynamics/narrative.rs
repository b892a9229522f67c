use rand::{Rng, SeedableRng, rngs::StdRng};

use super::*;

fn inputs(pixels: usize, c: f64, vel: f64, complete: bool) -> ArcInputs {
    ArcInputs {
        pixel_count: pixels,
        coherence: c,
        coherence_velocity: vel,
        narrative_complete: complete,
    }
}

fn arc_in(phase: ArcPhase) -> NarrativeArc {
    NarrativeArc::restore(phase, 0.0, 0.0)
}

#[test]
fn opening_needs_momentum_and_marks() {
    let p = NarrativeParams::default();
    let mut arc = NarrativeArc::new(0.0);
    for _ in 0..9 {
        arc.record_mark(1.0, 0.5);
    }
    assert!(arc.momentum() > 0.4);
    assert_eq!(arc.evaluate(&p, inputs(100, 0.5, 0.0, false), 1.0), None);
    arc.record_mark(1.0, 0.5);
    let t = arc.evaluate(&p, inputs(100, 0.5, 0.0, false), 2.0).unwrap();
    assert_eq!(t.from, ArcPhase::Opening);
    assert_eq!(t.to, ArcPhase::Developing);
    assert_eq!(arc.phase_marks(), 0);
    assert_eq!(arc.phase_started_at(), 2.0);
}

#[test]
fn fresh_canvas_restarts_arc() {
    let p = NarrativeParams::default();
    let mut arc = arc_in(ArcPhase::Resolving);
    let t = arc.evaluate(&p, inputs(3, 0.9, 0.0, false), 5.0).unwrap();
    assert_eq!(t.to, ArcPhase::Opening);
    assert_eq!(arc.evaluate(&p, inputs(3, 0.9, 0.0, false), 6.0), None);
}

#[test]
fn closing_is_terminal() {
    let p = NarrativeParams::default();
    let mut arc = arc_in(ArcPhase::Closing);
    assert_eq!(arc.evaluate(&p, inputs(0, 0.0, 0.0, false), 1.0), None);
    assert_eq!(arc.evaluate(&p, inputs(500, 0.1, 0.5, false), 1.0), None);
    assert_eq!(arc.phase(), ArcPhase::Closing);
}

#[test]
fn developing_resolves_only_when_stable() {
    let p = NarrativeParams::default();
    let mut arc = arc_in(ArcPhase::Developing);
    assert_eq!(arc.evaluate(&p, inputs(100, 0.7, 0.05, false), 1.0), None);
    let t = arc.evaluate(&p, inputs(100, 0.7, 0.01, false), 1.0).unwrap();
    assert_eq!(t.to, ArcPhase::Resolving);
}

#[test]
fn developing_regresses_on_false_start() {
    let p = NarrativeParams::default();
    let mut arc = arc_in(ArcPhase::Developing);
    for _ in 0..19 {
        arc.record_mark(0.0, 0.5);
    }
    assert_eq!(arc.evaluate(&p, inputs(100, 0.2, 0.0, false), 1.0), None);
    arc.record_mark(0.0, 0.5);
    let t = arc.evaluate(&p, inputs(100, 0.2, 0.0, false), 1.0).unwrap();
    assert_eq!(t.to, ArcPhase::Opening);
}

#[test]
fn resolving_closes_or_destabilizes() {
    let p = NarrativeParams::default();
    let mut arc = arc_in(ArcPhase::Resolving);
    let t = arc.evaluate(&p, inputs(100, 0.4, 0.0, false), 1.0).unwrap();
    assert_eq!(t.to, ArcPhase::Developing);

    let mut arc = arc_in(ArcPhase::Resolving);
    let t = arc.evaluate(&p, inputs(100, 0.4, 0.0, true), 1.0).unwrap();
    assert_eq!(t.to, ArcPhase::Closing);
}

#[test]
fn never_skips_phases_under_random_inputs() {
    let p = NarrativeParams::default();
    let mut rng = StdRng::seed_from_u64(42);
    let mut arc = NarrativeArc::new(0.0);
    let mut seen_closing = false;
    for step in 0..50_000 {
        arc.record_mark(rng.random(), 0.3);
        let x = inputs(
            rng.random_range(0..400),
            rng.random(),
            rng.random_range(-0.05..0.05),
            rng.random_bool(0.01),
        );
        if let Some(t) = arc.evaluate(&p, x, f64::from(step)) {
            let ok = matches!(
                (t.from, t.to),
                (_, ArcPhase::Opening)
                    | (ArcPhase::Opening, ArcPhase::Developing)
                    | (ArcPhase::Developing, ArcPhase::Resolving)
                    | (ArcPhase::Resolving, ArcPhase::Developing)
                    | (ArcPhase::Resolving, ArcPhase::Closing)
            );
            assert!(ok, "illegal transition {t:?}");
            assert_ne!(t.from, ArcPhase::Closing);
            if t.to == ArcPhase::Closing {
                seen_closing = true;
            }
        }
        if seen_closing {
            assert_eq!(arc.phase(), ArcPhase::Closing);
        }
    }
}

#[test]
fn phase_labels_round_trip() {
    for ph in [
        ArcPhase::Opening,
        ArcPhase::Developing,
        ArcPhase::Resolving,
        ArcPhase::Closing,
    ] {
        assert_eq!(ArcPhase::parse(ph.as_str()), Some(ph));
        assert_eq!(
            serde_json::to_string(&ph).unwrap(),
            format!("\"{}\"", ph.as_str())
        );
    }
    assert_eq!(ArcPhase::parse("finale"), None);
}
