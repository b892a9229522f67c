//! Tuning constants for the drawing loop.
//!
//! Every threshold the control system uses lives here so a device can be re-tuned from a JSON file
//! without touching code. All groups default to the shipped tuning and accept partial JSON
//! (`#[serde(default)]`).

use std::path::{Path, PathBuf};

use crate::foundation::core::{CanvasSize, Rgb8};
use crate::foundation::error::{EaselError, EaselResult};

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas: CanvasConfig,
    pub eisv: EisvParams,
    pub attention: AttentionParams,
    pub narrative: NarrativeParams,
    pub draw: DrawParams,
    pub light: LightParams,
    pub autonomy: AutonomyParams,
    /// Persisted canvas state file. `None` keeps everything in memory.
    pub state_path: Option<PathBuf>,
    /// Directory for completed drawings. `None` disables image output (sessions still count).
    pub drawings_dir: Option<PathBuf>,
    /// Name of the strategy used when nothing is persisted.
    pub default_era: String,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            eisv: EisvParams::default(),
            attention: AttentionParams::default(),
            narrative: NarrativeParams::default(),
            draw: DrawParams::default(),
            light: LightParams::default(),
            autonomy: AutonomyParams::default(),
            state_path: None,
            drawings_dir: None,
            default_era: crate::strategy::gestural::NAME.to_string(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Read and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> EaselResult<Self> {
        let bytes = std::fs::read(path)?;
        let cfg: Self = serde_json::from_slice(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that would break the clamp or timing invariants.
    pub fn validate(&self) -> EaselResult<()> {
        CanvasSize::new(self.canvas.width, self.canvas.height)?;
        self.eisv.validate()?;
        self.attention.validate()?;
        self.narrative.validate()?;
        self.draw.validate()?;
        self.light.validate()?;
        self.autonomy.validate()?;
        if self.default_era.trim().is_empty() {
            return Err(EaselError::validation("default_era must be non-empty"));
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize {
            width: self.canvas.width,
            height: self.canvas.height,
        }
    }
}

fn finite_non_negative(name: &str, v: f64) -> EaselResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(EaselError::validation(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn unit(name: &str, v: f64) -> EaselResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(EaselError::validation(format!("{name} must be in [0, 1]")));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Raster background for exported drawings.
    pub background: Rgb8,
    /// Capacity of the recent-coordinate ring.
    pub recent_capacity: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
            background: Rgb8::black(),
            recent_capacity: 20,
        }
    }
}

/// Coefficients of the EISV system.
///
/// ```text
/// dE = alpha(I_sig - E) - beta_e*E*S_sig + gamma_e*drift^2
/// dI = beta_i*C - k*S_sig - gamma_i*I
/// dS = -mu*S + lambda1*drift^2 - lambda2*C
/// dV = kappa(I_sig - E) - delta*V
/// C  = c_max * 0.5 * (1 + tanh(c1*V))
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EisvParams {
    pub alpha: f64,
    pub beta_e: f64,
    pub gamma_e: f64,
    pub beta_i: f64,
    pub k: f64,
    pub gamma_i: f64,
    pub mu: f64,
    pub lambda1: f64,
    pub lambda2: f64,
    pub kappa: f64,
    pub delta: f64,
    pub c_max: f64,
    pub c1: f64,
    /// Euler step per accepted mark.
    pub dt: f64,
}

impl Default for EisvParams {
    fn default() -> Self {
        Self {
            alpha: 0.4,
            beta_e: 0.1,
            gamma_e: 0.2,
            beta_i: 0.3,
            k: 0.1,
            gamma_i: 0.25,
            mu: 0.8,
            lambda1: 0.3,
            lambda2: 0.05,
            kappa: 0.5,
            delta: 0.3,
            c_max: 1.0,
            c1: 3.0,
            dt: 0.1,
        }
    }
}

impl EisvParams {
    fn validate(&self) -> EaselResult<()> {
        for (name, v) in [
            ("eisv.alpha", self.alpha),
            ("eisv.beta_e", self.beta_e),
            ("eisv.gamma_e", self.gamma_e),
            ("eisv.beta_i", self.beta_i),
            ("eisv.k", self.k),
            ("eisv.gamma_i", self.gamma_i),
            ("eisv.mu", self.mu),
            ("eisv.lambda1", self.lambda1),
            ("eisv.lambda2", self.lambda2),
            ("eisv.kappa", self.kappa),
            ("eisv.delta", self.delta),
            ("eisv.c1", self.c1),
        ] {
            finite_non_negative(name, v)?;
        }
        if !self.c_max.is_finite() || self.c_max <= 0.0 || self.c_max > 1.0 {
            return Err(EaselError::validation("eisv.c_max must be in (0, 1]"));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 || self.dt > 1.0 {
            return Err(EaselError::validation("eisv.dt must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Curiosity / engagement / fatigue rates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AttentionParams {
    /// Coherence below which the session counts as exploring.
    pub explore_coherence: f64,
    /// Curiosity drain per mark while exploring, scaled by `1 - C`.
    pub curiosity_drain: f64,
    /// Curiosity regeneration per mark once a pattern is found, scaled by `C`.
    pub curiosity_regen: f64,
    /// Flat curiosity drain per mark during `resolving`.
    pub resolving_drain: f64,
    /// Engagement smoothing factor.
    pub engagement_alpha: f64,
    pub fatigue_per_mark: f64,
    pub fatigue_per_switch: f64,
    /// Momentum smoothing factor for the intentionality signal.
    pub momentum_alpha: f64,
    /// Smoothing factor for coherence velocity.
    pub velocity_alpha: f64,
    pub gesture_history: usize,
    pub coherence_history: usize,
}

impl Default for AttentionParams {
    fn default() -> Self {
        Self {
            explore_coherence: 0.4,
            curiosity_drain: 0.01,
            curiosity_regen: 0.004,
            resolving_drain: 0.003,
            engagement_alpha: 0.1,
            fatigue_per_mark: 0.0008,
            fatigue_per_switch: 0.002,
            momentum_alpha: 0.1,
            velocity_alpha: 0.2,
            gesture_history: 20,
            coherence_history: 30,
        }
    }
}

impl AttentionParams {
    fn validate(&self) -> EaselResult<()> {
        unit("attention.explore_coherence", self.explore_coherence)?;
        for (name, v) in [
            ("attention.curiosity_drain", self.curiosity_drain),
            ("attention.curiosity_regen", self.curiosity_regen),
            ("attention.resolving_drain", self.resolving_drain),
            ("attention.fatigue_per_mark", self.fatigue_per_mark),
            ("attention.fatigue_per_switch", self.fatigue_per_switch),
        ] {
            finite_non_negative(name, v)?;
        }
        unit("attention.engagement_alpha", self.engagement_alpha)?;
        unit("attention.momentum_alpha", self.momentum_alpha)?;
        unit("attention.velocity_alpha", self.velocity_alpha)?;
        if self.gesture_history == 0 || self.coherence_history == 0 {
            return Err(EaselError::validation(
                "attention history capacities must be > 0",
            ));
        }
        Ok(())
    }
}

/// Arc transition thresholds and the five completion exits.
///
/// The exits are independent on purpose: each one unsticks a session that another can leave
/// hanging.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NarrativeParams {
    /// Below this pixel count the arc is forced back to `opening`.
    pub fresh_canvas_pixels: usize,
    pub develop_momentum: f64,
    pub develop_min_marks: u64,
    pub resolve_coherence: f64,
    pub resolve_max_velocity: f64,
    pub regress_coherence: f64,
    pub regress_momentum: f64,
    pub regress_min_marks: u64,
    pub destabilize_coherence: f64,

    pub settled_min_samples: usize,
    pub settled_window: usize,
    pub settled_mean: f64,
    pub settled_max_variance: f64,

    pub exhausted_curiosity: f64,
    pub exhausted_engagement: f64,
    pub exhausted_fatigue: f64,

    pub satisfied_composition: f64,
    pub satisfied_curiosity: f64,
    pub emergency_fatigue: f64,
    pub stall_energy: f64,
    pub stall_phase_secs: f64,
    pub stall_min_pixels: usize,
}

impl Default for NarrativeParams {
    fn default() -> Self {
        Self {
            fresh_canvas_pixels: 10,
            develop_momentum: 0.4,
            develop_min_marks: 10,
            resolve_coherence: 0.6,
            resolve_max_velocity: 0.02,
            regress_coherence: 0.3,
            regress_momentum: 0.3,
            regress_min_marks: 20,
            destabilize_coherence: 0.5,

            settled_min_samples: 20,
            settled_window: 10,
            settled_mean: 0.7,
            settled_max_variance: 0.01,

            exhausted_curiosity: 0.15,
            exhausted_engagement: 0.3,
            exhausted_fatigue: 0.8,

            satisfied_composition: 0.7,
            satisfied_curiosity: 0.2,
            emergency_fatigue: 0.85,
            stall_energy: 0.05,
            stall_phase_secs: 120.0,
            stall_min_pixels: 50,
        }
    }
}

impl NarrativeParams {
    fn validate(&self) -> EaselResult<()> {
        for (name, v) in [
            ("narrative.develop_momentum", self.develop_momentum),
            ("narrative.resolve_coherence", self.resolve_coherence),
            ("narrative.regress_coherence", self.regress_coherence),
            ("narrative.regress_momentum", self.regress_momentum),
            ("narrative.destabilize_coherence", self.destabilize_coherence),
            ("narrative.settled_mean", self.settled_mean),
            ("narrative.exhausted_curiosity", self.exhausted_curiosity),
            ("narrative.exhausted_engagement", self.exhausted_engagement),
            ("narrative.exhausted_fatigue", self.exhausted_fatigue),
            ("narrative.satisfied_composition", self.satisfied_composition),
            ("narrative.satisfied_curiosity", self.satisfied_curiosity),
            ("narrative.emergency_fatigue", self.emergency_fatigue),
            ("narrative.stall_energy", self.stall_energy),
        ] {
            unit(name, v)?;
        }
        finite_non_negative("narrative.resolve_max_velocity", self.resolve_max_velocity)?;
        finite_non_negative("narrative.settled_max_variance", self.settled_max_variance)?;
        finite_non_negative("narrative.stall_phase_secs", self.stall_phase_secs)?;
        if self.settled_window == 0 || self.settled_window > self.settled_min_samples {
            return Err(EaselError::validation(
                "narrative.settled_window must be in 1..=settled_min_samples",
            ));
        }
        if self.regress_coherence >= self.resolve_coherence {
            return Err(EaselError::validation(
                "narrative.regress_coherence must be below resolve_coherence",
            ));
        }
        Ok(())
    }
}

/// Mark-frequency modulation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DrawParams {
    pub base_rate: f64,
    /// Hard cap: no marks once the canvas holds this many pixels.
    pub max_pixels: usize,
    /// Multiplier applied to an empty canvas, easing to 1 at `boost_until_pixels`.
    pub boost_max: f64,
    pub boost_until_pixels: usize,
    /// Probability scale while the canvas is flagged satisfied.
    pub satisfied_rest_factor: f64,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            base_rate: 0.35,
            max_pixels: 15_000,
            boost_max: 3.0,
            boost_until_pixels: 500,
            satisfied_rest_factor: 0.2,
        }
    }
}

impl DrawParams {
    fn validate(&self) -> EaselResult<()> {
        finite_non_negative("draw.base_rate", self.base_rate)?;
        unit("draw.satisfied_rest_factor", self.satisfied_rest_factor)?;
        if !self.boost_max.is_finite() || self.boost_max < 1.0 {
            return Err(EaselError::validation("draw.boost_max must be >= 1"));
        }
        Ok(())
    }
}

/// Ambient-light classification with self-glow correction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LightParams {
    /// Lux the device's own LEDs add to its sensor at full brightness.
    pub glow_lux_at_full: f64,
    pub dark_lux: f64,
    pub dim_lux: f64,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            glow_lux_at_full: 400.0,
            dark_lux: 10.0,
            dim_lux: 200.0,
        }
    }
}

impl LightParams {
    fn validate(&self) -> EaselResult<()> {
        finite_non_negative("light.glow_lux_at_full", self.glow_lux_at_full)?;
        finite_non_negative("light.dark_lux", self.dark_lux)?;
        finite_non_negative("light.dim_lux", self.dim_lux)?;
        if self.dark_lux > self.dim_lux {
            return Err(EaselError::validation(
                "light.dark_lux must be <= light.dim_lux",
            ));
        }
        Ok(())
    }
}

/// Save/clear policy.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutonomyParams {
    /// Safety floor between saves.
    pub min_save_interval_secs: f64,
    /// Drawing pause after a clear so viewers see the empty canvas.
    pub pause_after_clear_secs: f64,
    /// How long an external "finished" signal stays actionable.
    pub finished_signal_window_secs: f64,
    /// Pixel floor for a completion-driven save.
    pub min_pixels_to_save: usize,
    /// Periodic state-file persistence interval.
    pub persist_interval_secs: f64,
}

impl Default for AutonomyParams {
    fn default() -> Self {
        Self {
            min_save_interval_secs: 60.0,
            pause_after_clear_secs: 5.0,
            finished_signal_window_secs: 60.0,
            min_pixels_to_save: 50,
            persist_interval_secs: 30.0,
        }
    }
}

impl AutonomyParams {
    fn validate(&self) -> EaselResult<()> {
        finite_non_negative("autonomy.min_save_interval_secs", self.min_save_interval_secs)?;
        finite_non_negative("autonomy.pause_after_clear_secs", self.pause_after_clear_secs)?;
        finite_non_negative(
            "autonomy.finished_signal_window_secs",
            self.finished_signal_window_secs,
        )?;
        finite_non_negative("autonomy.persist_interval_secs", self.persist_interval_secs)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
