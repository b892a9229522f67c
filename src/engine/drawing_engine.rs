use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::hooks::{CompletionEvent, CompletionObserver, CompletionReason, notify_all};
use super::intent::DrawingIntent;
use crate::canvas::Canvas;
use crate::canvas::persist::{LoadReport, LoadStatus};
use crate::config::EngineConfig;
use crate::dynamics::narrative::ArcTransition;
use crate::dynamics::state::{DynamicalState, DynamicsParams, RECENT_COHERENCE_WINDOW};
use crate::felt::{FeltState, LightRegime};
use crate::foundation::clock::{Clock, elapsed_secs};
use crate::foundation::core::{CanvasSize, Point};
use crate::foundation::error::EaselResult;
use crate::foundation::math::unit_or;
use crate::strategy::{
    ColorCtx, DriftCtx, GestureCues, HueCategory, MarkCtx, MarkStrategy, SessionGoal,
    StrategyRegistry,
};

/// What one [`DrawingEngine::draw`] call did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    /// Arc transition applied at the start of the tick.
    pub transition: Option<ArcTransition>,
    pub action: TickAction,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TickAction {
    /// Inside the post-clear pause; nothing evaluated.
    Paused,
    /// The canvas is at the pixel cap.
    AtCapacity,
    /// No mark sampled at this probability.
    Skipped { probability: f64 },
    Drew(MarkReport),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarkReport {
    pub gesture: &'static str,
    pub hue: HueCategory,
    pub light: LightRegime,
    /// Pixels written, counting overwrites.
    pub pixels_written: usize,
    pub probability: f64,
}

/// What one [`DrawingEngine::check_autonomy`] call did.
#[derive(Clone, Debug, PartialEq)]
pub enum AutonomyOutcome {
    /// No completion condition holds.
    Idle,
    /// Inside the post-clear pause.
    Paused,
    /// A completion holds but the save floor has not elapsed.
    Cooldown { reason: CompletionReason },
    /// Writing the drawing failed; the canvas was kept.
    SaveFailed { reason: CompletionReason },
    /// Saved and started a new session.
    Saved(CompletionEvent),
}

/// Result of [`DrawingEngine::request_era`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EraSwitch {
    /// Already the active era.
    Unchanged,
    /// Switched immediately (the canvas was nearly empty).
    Applied,
    /// Deferred until the next session.
    Queued,
}

/// Tick-driven orchestrator that owns the canvas, the dynamics and the active strategy.
pub struct DrawingEngine {
    config: EngineConfig,
    size: CanvasSize,
    registry: StrategyRegistry,
    strategy: Arc<dyn MarkStrategy>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    canvas: Canvas,
    intent: DrawingIntent,
    goal: SessionGoal,
    observers: Vec<Box<dyn CompletionObserver>>,
    load_report: Option<LoadReport>,
    last_felt: FeltState,
    finished_signal_at: Option<f64>,
    last_save_attempt: Option<f64>,
    last_persist: Option<f64>,
}

impl DrawingEngine {
    /// Build an engine, resuming from `config.state_path` when it holds a usable state file.
    pub fn new(
        config: EngineConfig,
        registry: StrategyRegistry,
        clock: Box<dyn Clock>,
    ) -> EaselResult<Self> {
        config.validate()?;
        let size = config.canvas_size();
        let now = clock.now();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let default = registry.get(&config.default_era)?;

        let (mut canvas, load_report) = match &config.state_path {
            Some(path) => {
                let (c, report) = Canvas::load_from_disk(
                    path,
                    size,
                    config.canvas.recent_capacity,
                    &config.default_era,
                );
                (c, Some(report))
            }
            None => (
                Canvas::new(size, config.canvas.recent_capacity, config.default_era.as_str()),
                None,
            ),
        };

        let strategy = match registry.get(canvas.era()) {
            Ok(s) => s,
            Err(_) => {
                warn!(era = canvas.era(), "persisted era not registered, using default");
                canvas.set_era(config.default_era.as_str());
                default
            }
        };
        if let Some(pending) = canvas.pending_era_switch()
            && !registry.contains(pending)
        {
            warn!(era = pending, "dropping queued switch to unregistered era");
            canvas.set_pending_era_switch(None);
        }

        let params = DynamicsParams::from(&config);
        let resumed = load_report
            .as_ref()
            .is_some_and(|r| r.status == LoadStatus::Loaded);
        let dynamics = if resumed {
            DynamicalState::restore(params, canvas.session(), now)
        } else {
            DynamicalState::new(params, now)
        };

        let last_felt = FeltState::default();
        let goal = SessionGoal::from_felt(&last_felt, &mut rng);
        let mut intent = DrawingIntent::new(size, &goal, dynamics, strategy.create_state(size));
        intent.marks = canvas.mark_count();
        if let Some(&(x, y)) = canvas.recent().last() {
            intent.focus = Point::new(f64::from(x), f64::from(y));
        }
        info!(
            era = strategy.name(),
            pixels = canvas.pixel_count(),
            phase = %intent.dynamics.arc_phase(),
            resumed,
            "drawing engine ready"
        );

        Ok(Self {
            config,
            size,
            registry,
            strategy,
            clock,
            rng,
            canvas,
            intent,
            goal,
            observers: Vec::new(),
            load_report,
            last_felt,
            finished_signal_at: None,
            last_save_attempt: None,
            last_persist: None,
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn CompletionObserver>) {
        self.observers.push(observer);
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn dynamics(&self) -> &DynamicalState {
        &self.intent.dynamics
    }

    pub fn intent(&self) -> &DrawingIntent {
        &self.intent
    }

    pub fn goal(&self) -> &SessionGoal {
        &self.goal
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn era(&self) -> &str {
        self.strategy.name()
    }

    /// How the state file load went, if a state path is configured.
    pub fn load_report(&self) -> Option<&LoadReport> {
        self.load_report.as_ref()
    }

    /// Sampling probability for the next tick.
    ///
    /// `base_rate * expression_intensity * derived_energy * boost`, scaled down while the canvas
    /// rests in the satisfied state.
    pub fn draw_probability(&self, felt: &FeltState) -> f64 {
        let d = &self.config.draw;
        let n = self.canvas.pixel_count();
        let boost = if n < d.boost_until_pixels {
            let ramp = 1.0 - n as f64 / d.boost_until_pixels as f64;
            1.0 + (d.boost_max - 1.0) * ramp
        } else {
            1.0
        };
        let mut p = d.base_rate
            * felt.sanitized().expression_intensity()
            * self.intent.dynamics.derived_energy()
            * boost;
        if self.canvas.is_satisfied() {
            p *= d.satisfied_rest_factor;
        }
        unit_or(p, 0.0)
    }

    /// One drawing tick.
    pub fn draw(&mut self, felt: &FeltState) -> TickOutcome {
        let felt = felt.sanitized();
        self.last_felt = felt;
        let now = self.clock.now();

        if self.canvas.is_drawing_paused(now) {
            return TickOutcome {
                transition: None,
                action: TickAction::Paused,
            };
        }

        let transition = self.intent.dynamics.check_transition(&self.canvas, now);
        if let Some(t) = transition {
            self.canvas.set_phase(t.to);
            info!(from = %t.from, to = %t.to, pixels = self.canvas.pixel_count(), "arc transition");
        }

        if self.canvas.pixel_count() >= self.config.draw.max_pixels {
            return TickOutcome {
                transition,
                action: TickAction::AtCapacity,
            };
        }

        let probability = self.draw_probability(&felt);
        if self.rng.random::<f64>() >= probability {
            return TickOutcome {
                transition,
                action: TickAction::Skipped { probability },
            };
        }

        let report = self.make_mark(&felt, probability);
        TickOutcome {
            transition,
            action: TickAction::Drew(report),
        }
    }

    fn make_mark(&mut self, felt: &FeltState, probability: f64) -> MarkReport {
        let light = felt.light_regime(&self.config.light);
        let coherence = self.intent.dynamics.coherence();
        let energy = self.intent.dynamics.derived_energy();
        let intent = &mut self.intent;

        intent.era_state.choose_gesture(
            GestureCues {
                clarity: felt.clarity,
                stability: felt.stability,
                presence: felt.presence,
                coherence,
            },
            &mut self.rng,
        );
        let (color, hue) = intent.era_state.generate_color(
            ColorCtx {
                warmth: felt.warmth,
                clarity: felt.clarity,
                stability: felt.stability,
                presence: felt.presence,
                light,
                goal: &self.goal,
            },
            &mut self.rng,
        );
        let pixels_written = intent.era_state.place_mark(
            &mut self.canvas,
            MarkCtx {
                focus: intent.focus,
                heading: intent.heading,
                energy,
                color,
                goal: &self.goal,
            },
            &mut self.rng,
        );
        let (focus, heading) = intent.era_state.drift_focus(
            DriftCtx {
                focus: intent.focus,
                heading: intent.heading,
                stability: felt.stability,
                presence: felt.presence,
                coherence,
                clarity: felt.clarity,
                size: self.size,
                goal: &self.goal,
            },
            &mut self.rng,
        );
        intent.focus = self.size.clamp_point(focus);
        intent.heading = heading;

        let gesture = intent.era_state.gesture();
        let vocab = intent.era_state.gestures().len();
        let intentionality = intent.era_state.intentionality();
        intent.dynamics.record_mark(gesture, intentionality, vocab);
        intent.marks = intent.marks.saturating_add(1);
        self.canvas
            .mirror_session(intent.marks, intent.dynamics.snapshot());

        debug!(gesture, pixels_written, total = self.canvas.pixel_count(), "mark");
        MarkReport {
            gesture,
            hue,
            light,
            pixels_written,
            probability,
        }
    }

    /// Record an external "I'm finished" signal.
    pub fn note_finished_signal(&mut self) {
        self.finished_signal_at = Some(self.clock.now());
    }

    fn finished_signal_recent(&self, now: f64) -> bool {
        self.finished_signal_at.is_some_and(|at| {
            elapsed_secs(at, now)
                .is_none_or(|e| e <= self.config.autonomy.finished_signal_window_secs)
        })
    }

    fn save_floor_elapsed(&self, now: f64) -> bool {
        let last = if self.canvas.drawings_saved() > 0 {
            Some(self.canvas.last_save_time())
        } else {
            None
        };
        let last = match (last, self.last_save_attempt) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        match last {
            None => true,
            Some(at) => elapsed_secs(at, now)
                .is_none_or(|e| e >= self.config.autonomy.min_save_interval_secs),
        }
    }

    /// Decide whether the drawing is finished; if so, save it and start a new session.
    #[tracing::instrument(skip_all, fields(pixels = self.canvas.pixel_count()))]
    pub fn check_autonomy(&mut self, felt: &FeltState) -> AutonomyOutcome {
        self.last_felt = felt.sanitized();
        let now = self.clock.now();
        if self.canvas.is_drawing_paused(now) {
            return AutonomyOutcome::Paused;
        }

        let pixels = self.canvas.pixel_count();
        let min = self.config.autonomy.min_pixels_to_save;
        let reason = if self.finished_signal_recent(now) && pixels > min {
            CompletionReason::FinishedSignal
        } else if let Some(path) = self.intent.dynamics.completion_path(&self.canvas, now)
            && pixels >= min
        {
            CompletionReason::Narrative(path)
        } else {
            return AutonomyOutcome::Idle;
        };

        if !self.save_floor_elapsed(now) {
            if matches!(reason, CompletionReason::Narrative(_)) && !self.canvas.is_satisfied() {
                debug!(%reason, "complete but inside save floor, resting");
                self.canvas.mark_satisfied();
            }
            return AutonomyOutcome::Cooldown { reason };
        }

        match self.save_drawing(reason, now) {
            Ok(event) => {
                self.start_session(now);
                self.persist_best_effort();
                AutonomyOutcome::Saved(event)
            }
            Err(err) => {
                warn!(%err, %reason, "saving drawing failed, keeping canvas");
                AutonomyOutcome::SaveFailed { reason }
            }
        }
    }

    /// Write the image, count the save and notify observers. Does not clear.
    fn save_drawing(&mut self, reason: CompletionReason, now: f64) -> EaselResult<CompletionEvent> {
        self.last_save_attempt = Some(now);
        let image_path = match &self.config.drawings_dir {
            Some(dir) => {
                let at = timestamp(now);
                Some(self.canvas.export_png(dir, self.config.canvas.background, at)?)
            }
            None => None,
        };
        let recent = self
            .intent
            .dynamics
            .coherence_tracker()
            .recent_mean(RECENT_COHERENCE_WINDOW);
        let event = CompletionEvent {
            pixel_count: self.canvas.pixel_count(),
            mark_count: self.intent.marks,
            coherence: self.intent.dynamics.coherence(),
            compositional_satisfaction: self.canvas.composition_score(recent),
            reason,
            image_path,
            era: self.strategy.name().to_string(),
        };
        self.canvas.record_save(now);
        info!(
            %reason,
            pixels = event.pixel_count,
            marks = event.mark_count,
            saved = self.canvas.drawings_saved(),
            "drawing complete"
        );
        notify_all(&mut self.observers, &event);
        Ok(event)
    }

    /// Clear, apply any queued era switch, and start fresh dynamics with a new goal.
    fn start_session(&mut self, now: f64) {
        self.canvas
            .clear(now, self.config.autonomy.pause_after_clear_secs);
        self.finished_signal_at = None;

        if let Some(next) = self.canvas.pending_era_switch().map(str::to_string) {
            match self.registry.get(&next) {
                Ok(s) => {
                    info!(from = self.strategy.name(), to = %next, "era switch applied");
                    self.strategy = s;
                    self.canvas.set_era(next);
                }
                Err(err) => warn!(%err, "queued era switch dropped"),
            }
            self.canvas.set_pending_era_switch(None);
        }

        self.goal = SessionGoal::from_felt(&self.last_felt, &mut self.rng);
        let dynamics = DynamicalState::new(DynamicsParams::from(&self.config), now);
        self.intent = DrawingIntent::new(
            self.size,
            &self.goal,
            dynamics,
            self.strategy.create_state(self.size),
        );
        debug!(goal = ?self.goal, era = self.strategy.name(), "new session");
    }

    /// End the current session.
    ///
    /// Unless `already_saved`, a canvas holding enough pixels is saved first; if that save fails
    /// nothing is cleared and the error is returned.
    pub fn reset_session(&mut self, already_saved: bool) -> EaselResult<Option<CompletionEvent>> {
        let now = self.clock.now();
        let event = if !already_saved
            && self.canvas.pixel_count() >= self.config.autonomy.min_pixels_to_save
        {
            Some(self.save_drawing(CompletionReason::Reset, now)?)
        } else {
            None
        };
        self.start_session(now);
        self.persist_best_effort();
        Ok(event)
    }

    /// Switch strategy now if the canvas is nearly empty, otherwise at the next session.
    pub fn request_era(&mut self, name: &str) -> EaselResult<EraSwitch> {
        let strategy = self.registry.get(name)?;
        if name == self.strategy.name() {
            self.canvas.set_pending_era_switch(None);
            return Ok(EraSwitch::Unchanged);
        }
        if self.canvas.pixel_count() < self.config.autonomy.min_pixels_to_save {
            info!(from = self.strategy.name(), to = name, "era switch applied");
            self.intent.era_state = strategy.create_state(self.size);
            self.strategy = strategy;
            self.canvas.set_era(name);
            self.canvas.set_pending_era_switch(None);
            Ok(EraSwitch::Applied)
        } else {
            info!(to = name, "era switch queued");
            self.canvas.set_pending_era_switch(Some(name.to_string()));
            Ok(EraSwitch::Queued)
        }
    }

    /// Write the state file now. A no-op without a state path.
    pub fn persist(&mut self) -> EaselResult<()> {
        let Some(path) = self.config.state_path.clone() else {
            return Ok(());
        };
        self.canvas.save_to_disk(&path)?;
        self.last_persist = Some(self.clock.now());
        Ok(())
    }

    /// Write the state file if it changed and the persistence interval elapsed.
    pub fn persist_if_due(&mut self) -> EaselResult<bool> {
        if self.config.state_path.is_none() || !self.canvas.is_dirty() {
            return Ok(false);
        }
        let now = self.clock.now();
        let due = self.last_persist.is_none_or(|at| {
            elapsed_secs(at, now).is_none_or(|e| e >= self.config.autonomy.persist_interval_secs)
        });
        if !due {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist_best_effort(&mut self) {
        if let Err(err) = self.persist() {
            warn!(%err, "persisting canvas state failed");
        }
    }

    #[cfg(test)]
    pub(crate) fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    #[cfg(test)]
    pub(crate) fn dynamics_mut(&mut self) -> &mut DynamicalState {
        &mut self.intent.dynamics
    }
}

impl std::fmt::Debug for DrawingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingEngine")
            .field("era", &self.strategy.name())
            .field("pixels", &self.canvas.pixel_count())
            .field("phase", &self.intent.dynamics.arc_phase())
            .field("marks", &self.intent.marks)
            .finish_non_exhaustive()
    }
}

/// Clock seconds as a UTC timestamp for file naming.
fn timestamp(now: f64) -> DateTime<Utc> {
    if now.is_finite() {
        let secs = now.floor();
        let nanos = ((now - secs) * 1e9) as u32;
        if let Some(at) = DateTime::from_timestamp(secs as i64, nanos.min(999_999_999)) {
            return at;
        }
    }
    Utc::now()
}

#[cfg(test)]
#[path = "../../tests/unit/engine/drawing_engine.rs"]
mod tests;
