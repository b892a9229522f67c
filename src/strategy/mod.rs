//! Pluggable mark-making strategies ("eras").
//!
//! A [`MarkStrategy`] is a stateless factory registered by name. Each session it creates a boxed
//! [`StrategyState`] that owns whatever per-session data the strategy needs; the engine talks to
//! that state only through the trait and never downcasts it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rand::RngCore;

use crate::canvas::Canvas;
use crate::felt::LightRegime;
use crate::foundation::core::{CanvasSize, Point, Rgb8};
use crate::foundation::error::{EaselError, EaselResult};

pub mod gestural;
pub mod goal;

pub use goal::{CoverageTarget, SessionGoal};

/// Coarse hue family of a generated color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HueCategory {
    Warm,
    Cool,
    Neutral,
}

impl HueCategory {
    /// Classify a hue in degrees. Low-saturation colors are neutral regardless of hue.
    pub fn classify(hue_deg: f64, saturation: f64) -> Self {
        if saturation < 0.15 {
            return Self::Neutral;
        }
        let h = hue_deg.rem_euclid(360.0);
        if !(75.0..=285.0).contains(&h) {
            Self::Warm
        } else if (150.0..=270.0).contains(&h) {
            Self::Cool
        } else {
            Self::Neutral
        }
    }
}

/// Felt-state cues for gesture choice.
#[derive(Clone, Copy, Debug)]
pub struct GestureCues {
    pub clarity: f64,
    pub stability: f64,
    pub presence: f64,
    pub coherence: f64,
}

/// Inputs for placing one mark.
#[derive(Clone, Copy, Debug)]
pub struct MarkCtx<'a> {
    pub focus: Point,
    pub heading: f64,
    /// Derived energy in `[0, 1]`.
    pub energy: f64,
    pub color: Rgb8,
    pub goal: &'a SessionGoal,
}

/// Inputs for moving the focus after a mark.
#[derive(Clone, Copy, Debug)]
pub struct DriftCtx<'a> {
    pub focus: Point,
    pub heading: f64,
    pub stability: f64,
    pub presence: f64,
    pub coherence: f64,
    pub clarity: f64,
    pub size: CanvasSize,
    pub goal: &'a SessionGoal,
}

/// Inputs for choosing a color.
#[derive(Clone, Copy, Debug)]
pub struct ColorCtx<'a> {
    pub warmth: f64,
    pub clarity: f64,
    pub stability: f64,
    pub presence: f64,
    pub light: LightRegime,
    pub goal: &'a SessionGoal,
}

/// A named mark-making algorithm.
pub trait MarkStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fresh per-session state for a canvas of `size`.
    fn create_state(&self, size: CanvasSize) -> Box<dyn StrategyState>;
}

/// Per-session strategy state. Owned by the drawing intent and dropped on reset or era switch.
pub trait StrategyState: Send + fmt::Debug {
    /// The full gesture vocabulary, used to normalize entropy.
    fn gestures(&self) -> &'static [&'static str];

    /// Label of the current gesture.
    fn gesture(&self) -> &'static str;

    /// Commitment to the current gesture run, in `[0, 1]`.
    fn intentionality(&self) -> f64;

    /// Continue or replace the current gesture run.
    fn choose_gesture(&mut self, cues: GestureCues, rng: &mut dyn RngCore);

    /// Write one mark around the focus. Returns the number of pixels written.
    fn place_mark(&mut self, canvas: &mut Canvas, ctx: MarkCtx<'_>, rng: &mut dyn RngCore)
    -> usize;

    /// Next focus and heading. The returned point must lie on the canvas.
    fn drift_focus(&mut self, ctx: DriftCtx<'_>, rng: &mut dyn RngCore) -> (Point, f64);

    fn generate_color(&mut self, ctx: ColorCtx<'_>, rng: &mut dyn RngCore) -> (Rgb8, HueCategory);
}

/// Strategies available to an engine, keyed by name.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Arc<dyn MarkStrategy>>,
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.strategies.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the strategies shipped in this crate.
    pub fn with_builtin() -> Self {
        let mut reg = Self::new();
        reg.register(Arc::new(gestural::Gestural));
        reg
    }

    /// Add or replace a strategy under its own name.
    pub fn register(&mut self, strategy: Arc<dyn MarkStrategy>) {
        self.strategies.insert(strategy.name().to_string(), strategy);
    }

    pub fn get(&self, name: &str) -> EaselResult<Arc<dyn MarkStrategy>> {
        self.strategies
            .get(name)
            .cloned()
            .ok_or_else(|| EaselError::validation(format!("unknown strategy '{name}'")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strategy/registry.rs"]
mod tests;
