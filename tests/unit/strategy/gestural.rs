use rand::{SeedableRng, rngs::StdRng};

use super::*;
use crate::strategy::SessionGoal;

fn cues(stability: f64) -> GestureCues {
    GestureCues {
        clarity: 0.5,
        stability,
        presence: 0.5,
        coherence: 0.5,
    }
}

#[test]
fn vocabulary_is_fixed() {
    let st = Gestural.create_state(CanvasSize::default());
    assert_eq!(st.gestures(), &["dot", "stroke", "curve", "cluster", "drag"]);
    assert!(st.gestures().contains(&st.gesture()));
}

#[test]
fn intentionality_rises_through_a_run() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut st = GesturalState::new(CanvasSize::default());
    st.choose_gesture(cues(1.0), &mut rng);
    let g = st.gesture();
    let mut last = st.intentionality();
    let run = st.run_len;
    assert!(run >= 13, "stable runs are long, got {run}");
    for _ in 1..run {
        st.choose_gesture(cues(1.0), &mut rng);
        assert_eq!(st.gesture(), g);
        let i = st.intentionality();
        assert!(i > last);
        last = i;
    }
    assert!((last - 1.0).abs() < 1e-12);
}

#[test]
fn unstable_runs_are_short() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut st = GesturalState::new(CanvasSize::default());
    for _ in 0..50 {
        st.run_pos = st.run_len;
        st.choose_gesture(cues(0.0), &mut rng);
        assert!((1..=5).contains(&st.run_len));
    }
}

#[test]
fn every_gesture_writes_inside_the_canvas() {
    let mut rng = StdRng::seed_from_u64(2);
    let goal = SessionGoal::default();
    let size = CanvasSize::default();
    for g in Gesture::ALL {
        for (focus, must_write) in [(Point::new(120.0, 120.0), true), (Point::new(238.0, 1.0), false)] {
            let mut canvas = Canvas::new(size, 20, NAME);
            let mut st = GesturalState::new(size);
            st.gesture = g;
            let ctx = MarkCtx {
                focus,
                heading: 0.3,
                energy: 1.0,
                color: Rgb8::new(10, 200, 30),
                goal: &goal,
            };
            let n = st.place_mark(&mut canvas, ctx, &mut rng);
            if must_write {
                assert!(n >= 1, "{g:?} wrote nothing");
            }
            assert!(canvas.pixel_count() <= n);
            for ((x, y), _) in canvas.pixels() {
                assert!(x < 240 && y < 240);
            }
        }
    }
}

#[test]
fn drift_stays_on_canvas_and_normalizes_heading() {
    let mut rng = StdRng::seed_from_u64(9);
    let goal = SessionGoal::default();
    let size = CanvasSize::default();
    let mut st = GesturalState::new(size);
    let mut focus = Point::new(0.0, 0.0);
    let mut heading = 4.0;
    for _ in 0..500 {
        let ctx = DriftCtx {
            focus,
            heading,
            stability: 0.0,
            presence: 0.1,
            coherence: 0.0,
            clarity: 0.0,
            size,
            goal: &goal,
        };
        (focus, heading) = st.drift_focus(ctx, &mut rng);
        assert!((0.0..=239.0).contains(&focus.x));
        assert!((0.0..=239.0).contains(&focus.y));
        assert!((0.0..TAU).contains(&heading));
    }
}

#[test]
fn warmth_and_light_shape_color() {
    let mut rng = StdRng::seed_from_u64(1);
    let goal = SessionGoal::default();
    let mut st = GesturalState::new(CanvasSize::default());
    let ctx = |warmth, light| ColorCtx {
        warmth,
        clarity: 1.0,
        stability: 1.0,
        presence: 1.0,
        light,
        goal: &goal,
    };
    let (_, warm) = st.generate_color(ctx(1.0, LightRegime::Bright), &mut rng);
    let (_, cool) = st.generate_color(ctx(0.0, LightRegime::Bright), &mut rng);
    assert_eq!(warm, HueCategory::Warm);
    assert_eq!(cool, HueCategory::Cool);

    let brightest = |c: Rgb8| c.r.max(c.g).max(c.b);
    let (dark, _) = st.generate_color(ctx(0.5, LightRegime::Dark), &mut rng);
    let (bright, _) = st.generate_color(ctx(0.5, LightRegime::Bright), &mut rng);
    assert!(brightest(dark) < brightest(bright));
}

#[test]
fn hsv_primaries() {
    let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
    assert_eq!((r, g, b), (1.0, 0.0, 0.0));
    let (r, g, b) = hsv_to_rgb(240.0, 1.0, 1.0);
    assert_eq!((r, g, b), (0.0, 0.0, 1.0));
}
