//! The built-in gestural strategy: runs of dots, strokes, curves, clusters and drags.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{ParamCurve, QuadBez};
use rand::{Rng, RngCore};

use super::{ColorCtx, DriftCtx, GestureCues, HueCategory, MarkCtx, MarkStrategy, StrategyState};
use crate::canvas::Canvas;
use crate::felt::LightRegime;
use crate::foundation::core::{CanvasSize, Point, Rgb8, Vec2};
use crate::foundation::math::unit_or;

pub const NAME: &str = "gestural";

const GESTURES: &[&str] = &["dot", "stroke", "curve", "cluster", "drag"];

/// Canvas edge the mark sizes are tuned for.
const REFERENCE_EDGE: f64 = 240.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gesture {
    Dot,
    Stroke,
    Curve,
    Cluster,
    Drag,
}

impl Gesture {
    const ALL: [Gesture; 5] = [
        Gesture::Dot,
        Gesture::Stroke,
        Gesture::Curve,
        Gesture::Cluster,
        Gesture::Drag,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Stroke => "stroke",
            Self::Curve => "curve",
            Self::Cluster => "cluster",
            Self::Drag => "drag",
        }
    }

    fn weight(self, c: &GestureCues) -> f64 {
        match self {
            Self::Dot => 0.5 + 0.5 * c.presence,
            Self::Stroke => 0.4 + c.clarity,
            Self::Curve => 0.3 + c.coherence,
            Self::Cluster => 0.3 + (1.0 - c.stability),
            Self::Drag => 0.2 + 0.5 * (1.0 - c.clarity),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Gestural;

impl MarkStrategy for Gestural {
    fn name(&self) -> &'static str {
        NAME
    }

    fn create_state(&self, size: CanvasSize) -> Box<dyn StrategyState> {
        Box::new(GesturalState::new(size))
    }
}

#[derive(Clone, Debug)]
pub struct GesturalState {
    gesture: Gesture,
    run_len: u32,
    run_pos: u32,
    /// Mark length multiplier for non-reference canvas sizes.
    scale: f64,
}

impl GesturalState {
    pub fn new(size: CanvasSize) -> Self {
        let edge = f64::from(size.width.min(size.height));
        Self {
            gesture: Gesture::Dot,
            run_len: 0,
            run_pos: 0,
            scale: (edge / REFERENCE_EDGE).clamp(0.25, 4.0),
        }
    }

    fn pick(cues: &GestureCues, rng: &mut dyn RngCore) -> Gesture {
        let total: f64 = Gesture::ALL.iter().map(|g| g.weight(cues)).sum();
        let mut r = rng.random::<f64>() * total;
        for g in Gesture::ALL {
            r -= g.weight(cues);
            if r <= 0.0 {
                return g;
            }
        }
        Gesture::Dot
    }
}

fn plot(canvas: &mut Canvas, p: Point, color: Rgb8) -> usize {
    usize::from(canvas.draw_pixel(p.x.round() as i64, p.y.round() as i64, color))
}

impl StrategyState for GesturalState {
    fn gestures(&self) -> &'static [&'static str] {
        GESTURES
    }

    fn gesture(&self) -> &'static str {
        self.gesture.as_str()
    }

    fn intentionality(&self) -> f64 {
        if self.run_len == 0 {
            return 0.3;
        }
        let progress = f64::from(self.run_pos) / f64::from(self.run_len);
        unit_or(0.3 + 0.7 * progress, 0.3)
    }

    fn choose_gesture(&mut self, cues: GestureCues, rng: &mut dyn RngCore) {
        if self.run_pos < self.run_len {
            self.run_pos += 1;
            return;
        }
        let cues = GestureCues {
            clarity: unit_or(cues.clarity, 0.5),
            stability: unit_or(cues.stability, 0.5),
            presence: unit_or(cues.presence, 0.5),
            coherence: unit_or(cues.coherence, 0.5),
        };
        self.gesture = Self::pick(&cues, rng);
        let base = 3.0 + 12.0 * cues.stability;
        self.run_len = (base + rng.random_range(-2.0..=2.0)).round().max(1.0) as u32;
        self.run_pos = 1;
    }

    fn place_mark(
        &mut self,
        canvas: &mut Canvas,
        ctx: MarkCtx<'_>,
        rng: &mut dyn RngCore,
    ) -> usize {
        let size = self.scale * ctx.goal.coverage_scale() * (0.5 + unit_or(ctx.energy, 0.0));
        let dir = Vec2::from_angle(ctx.heading);
        let mut written = 0;
        match self.gesture {
            Gesture::Dot => {
                written += plot(canvas, ctx.focus, ctx.color);
                if size > 1.2 {
                    for off in [Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)] {
                        written += plot(canvas, ctx.focus + off, ctx.color);
                    }
                }
            }
            Gesture::Stroke => {
                let len = (4.0 + 8.0 * size).round() as u32;
                for t in 0..len {
                    written += plot(canvas, ctx.focus + dir * f64::from(t), ctx.color);
                }
            }
            Gesture::Curve => {
                let len = 6.0 + 10.0 * size;
                let bend = rng.random_range(-0.6..=0.6) * len;
                let normal = Vec2::new(-dir.y, dir.x);
                let end = ctx.focus + dir * len;
                let ctrl = ctx.focus.midpoint(end) + normal * bend;
                let curve = QuadBez::new(ctx.focus, ctrl, end);
                let steps = (len * 1.5).ceil() as u32;
                for i in 0..=steps {
                    let t = f64::from(i) / f64::from(steps.max(1));
                    written += plot(canvas, curve.eval(t), ctx.color);
                }
            }
            Gesture::Cluster => {
                let n = (3.0 + 5.0 * size).round() as u32;
                let radius = 1.0 + 3.0 * size;
                for _ in 0..n {
                    let off = Vec2::from_angle(rng.random_range(0.0..TAU))
                        * rng.random_range(0.0..=radius);
                    written += plot(canvas, ctx.focus + off, ctx.color);
                }
            }
            Gesture::Drag => {
                let len = (6.0 + 10.0 * size).round() as u32;
                let normal = Vec2::new(-dir.y, dir.x);
                let mut color = ctx.color;
                for t in 0..len {
                    let wobble = rng.random_range(-0.7..=0.7);
                    let p = ctx.focus + dir * f64::from(t) + normal * wobble;
                    written += plot(canvas, p, color);
                    color = color.jitter(-3, -3, -3);
                }
            }
        }
        written
    }

    fn drift_focus(&mut self, ctx: DriftCtx<'_>, rng: &mut dyn RngCore) -> (Point, f64) {
        let stability = unit_or(ctx.stability, 0.5);
        let presence = unit_or(ctx.presence, 0.5);
        let jitter = (1.0 - unit_or(ctx.coherence, 0.5)) * (1.0 - unit_or(ctx.clarity, 0.5));

        let mut heading = ctx.heading + rng.random_range(-1.0..=1.0) * (0.1 + FRAC_PI_2 * jitter);
        let step = self.scale * (2.0 + 6.0 * (1.0 - stability));
        let mut next = ctx.focus + Vec2::from_angle(heading) * step;

        if presence < 0.3 {
            next = next.lerp(ctx.size.center(), 0.05 * (1.0 - presence));
        }
        let clamped = ctx.size.clamp_point(next);
        if clamped != next {
            // Turn back from the edge.
            heading += PI;
        }
        let heading = heading.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU.
        let heading = if heading.is_finite() && heading < TAU { heading } else { 0.0 };
        (clamped, heading)
    }

    fn generate_color(&mut self, ctx: ColorCtx<'_>, rng: &mut dyn RngCore) -> (Rgb8, HueCategory) {
        let warmth = unit_or(unit_or(ctx.warmth, 0.5) + ctx.goal.warmth_bias, 0.5);
        let spread = 10.0 + 40.0 * (1.0 - unit_or(ctx.stability, 0.5));
        let hue = (210.0 - 190.0 * warmth + rng.random_range(-1.0..=1.0) * spread).rem_euclid(360.0);
        let sat = 0.35 + 0.55 * unit_or(ctx.clarity, 0.5);
        let light = match ctx.light {
            LightRegime::Dark => 0.55,
            LightRegime::Dim => 0.75,
            LightRegime::Bright => 0.95,
        };
        let value = light * (0.7 + 0.3 * unit_or(ctx.presence, 0.5));
        let (r, g, b) = hsv_to_rgb(hue, sat, value);
        (Rgb8::from_unit(r, g, b), HueCategory::classify(hue, sat))
    }
}

/// `h` in degrees, `s` and `v` in `[0, 1]`.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let c = v * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    (r + m, g + m, b + m)
}

#[cfg(test)]
#[path = "../../tests/unit/strategy/gestural.rs"]
mod tests;
