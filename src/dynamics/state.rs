use std::fmt;

use crate::canvas::Canvas;
use crate::config::{AttentionParams, EisvParams, EngineConfig, NarrativeParams};
use crate::dynamics::attention::Attention;
use crate::dynamics::coherence::CoherenceTracker;
use crate::dynamics::eisv::{Eisv, MarkSignals};
use crate::dynamics::narrative::{ArcInputs, ArcPhase, ArcTransition, NarrativeArc};
use crate::foundation::clock::elapsed_secs;
use crate::foundation::math::{normalized_label_entropy, switch_rate};
use crate::foundation::ring::Ring;

/// Window used for "recent coherence" in composition scoring.
pub const RECENT_COHERENCE_WINDOW: usize = 10;

/// Parameter groups the dynamical state reads on every mark.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicsParams {
    pub eisv: EisvParams,
    pub attention: AttentionParams,
    pub narrative: NarrativeParams,
}

impl From<&EngineConfig> for DynamicsParams {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            eisv: cfg.eisv.clone(),
            attention: cfg.attention.clone(),
            narrative: cfg.narrative.clone(),
        }
    }
}

/// Which exit declared the drawing complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPath {
    /// The arc already reached `closing`.
    Closing,
    /// Coherence settled high and attention is exhausted.
    SettledAndExhausted,
    /// The composition scores well and curiosity is low.
    CompositionSatisfied,
    /// Fatigue passed the emergency threshold.
    EmergencyFatigue,
    /// Energy collapsed in a long-running phase on a non-trivial canvas.
    Stalled,
}

impl fmt::Display for CompletionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Closing => "closing",
            Self::SettledAndExhausted => "settled_and_exhausted",
            Self::CompositionSatisfied => "composition_satisfied",
            Self::EmergencyFatigue => "emergency_fatigue",
            Self::Stalled => "stalled",
        })
    }
}

/// The dynamical fields mirrored onto the canvas so a restart resumes mid-session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub attention: Attention,
    pub arc_phase: ArcPhase,
    pub coherence_history: Vec<f64>,
    pub coherence_velocity: f64,
    pub intentionality_momentum: f64,
    pub eisv: Eisv,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            attention: Attention::default(),
            arc_phase: ArcPhase::Opening,
            coherence_history: Vec::new(),
            coherence_velocity: 0.0,
            intentionality_momentum: 0.0,
            eisv: Eisv::default(),
        }
    }
}

/// EISV + attention + coherence + narrative, advanced once per accepted mark.
#[derive(Clone, Debug)]
pub struct DynamicalState {
    params: DynamicsParams,
    eisv: Eisv,
    attention: Attention,
    coherence: CoherenceTracker,
    arc: NarrativeArc,
    gestures: Ring<&'static str>,
}

impl DynamicalState {
    pub fn new(params: DynamicsParams, now: f64) -> Self {
        let coherence = CoherenceTracker::new(params.attention.coherence_history);
        let gestures = Ring::new(params.attention.gesture_history);
        Self {
            params,
            eisv: Eisv::default(),
            attention: Attention::default(),
            coherence,
            arc: NarrativeArc::new(now),
            gestures,
        }
    }

    /// Rebuild from mirrored fields. Gesture history is not persisted and starts empty.
    pub fn restore(params: DynamicsParams, snap: &SessionSnapshot, now: f64) -> Self {
        let coherence = CoherenceTracker::restore(
            params.attention.coherence_history,
            &snap.coherence_history,
            snap.coherence_velocity,
        );
        let mut eisv = snap.eisv;
        eisv.clamp();
        let gestures = Ring::new(params.attention.gesture_history);
        Self {
            eisv,
            attention: snap.attention.sanitized(),
            coherence,
            arc: NarrativeArc::restore(snap.arc_phase, snap.intentionality_momentum, now),
            gestures,
            params,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            attention: self.attention,
            arc_phase: self.arc.phase(),
            coherence_history: self.coherence.samples(),
            coherence_velocity: self.coherence.velocity(),
            intentionality_momentum: self.arc.momentum(),
            eisv: self.eisv,
        }
    }

    pub fn params(&self) -> &DynamicsParams {
        &self.params
    }

    pub fn eisv(&self) -> Eisv {
        self.eisv
    }

    pub fn attention(&self) -> Attention {
        self.attention
    }

    pub fn arc(&self) -> &NarrativeArc {
        &self.arc
    }

    pub fn arc_phase(&self) -> ArcPhase {
        self.arc.phase()
    }

    pub fn coherence_tracker(&self) -> &CoherenceTracker {
        &self.coherence
    }

    /// Current `C(V)`.
    pub fn coherence(&self) -> f64 {
        self.eisv.coherence(&self.params.eisv)
    }

    pub fn derived_energy(&self) -> f64 {
        self.attention.derived_energy()
    }

    /// Record a mark made with `gesture` and advance every continuous signal by one step.
    ///
    /// Entropy is normalized by `log2(vocab_size)` over the bounded gesture history; drift is the
    /// switch rate over the same window.
    pub fn record_mark(
        &mut self,
        gesture: &'static str,
        intentionality: f64,
        vocab_size: usize,
    ) -> MarkSignals {
        let switched = self.gestures.last().is_some_and(|&g| g != gesture);
        self.gestures.push(gesture);
        let entropy = normalized_label_entropy(self.gestures.iter().copied(), vocab_size);
        let drift = switch_rate(self.gestures.iter().copied());
        let sig = MarkSignals::new(intentionality, entropy, drift);
        self.apply_signals(sig, switched);
        sig
    }

    /// Advance with externally computed signals.
    pub fn apply_signals(&mut self, sig: MarkSignals, switched: bool) {
        let p = &self.params;
        self.eisv.step(sig, &p.eisv);
        let c = self.eisv.coherence(&p.eisv);
        self.coherence.record(c, p.attention.velocity_alpha);
        self.attention.update(
            &p.attention,
            self.arc.phase(),
            c,
            sig.intentionality,
            sig.entropy,
            switched,
        );
        self.arc.record_mark(sig.intentionality, p.attention.momentum_alpha);
    }

    /// At least `settled_min_samples` coherence samples, and the recent window is high and quiet.
    pub fn coherence_settled(&self) -> bool {
        let n = &self.params.narrative;
        self.coherence.settled(
            n.settled_min_samples,
            n.settled_window,
            n.settled_mean,
            n.settled_max_variance,
        )
    }

    pub fn attention_exhausted(&self) -> bool {
        let n = &self.params.narrative;
        self.attention.exhausted(
            n.exhausted_curiosity,
            n.exhausted_engagement,
            n.exhausted_fatigue,
        )
    }

    /// First exit path that holds, checked in a fixed order.
    pub fn completion_path(&self, canvas: &Canvas, now: f64) -> Option<CompletionPath> {
        let n = &self.params.narrative;
        if self.arc.phase() == ArcPhase::Closing {
            return Some(CompletionPath::Closing);
        }
        if self.coherence_settled() && self.attention_exhausted() {
            return Some(CompletionPath::SettledAndExhausted);
        }
        if self.attention.curiosity < n.satisfied_curiosity {
            let score = canvas
                .composition_score(self.coherence.recent_mean(RECENT_COHERENCE_WINDOW));
            if score > n.satisfied_composition {
                return Some(CompletionPath::CompositionSatisfied);
            }
        }
        if self.attention.fatigue > n.emergency_fatigue {
            return Some(CompletionPath::EmergencyFatigue);
        }
        let phase_secs = elapsed_secs(self.arc.phase_started_at(), now).unwrap_or(0.0);
        if self.derived_energy() < n.stall_energy
            && phase_secs > n.stall_phase_secs
            && canvas.pixel_count() >= n.stall_min_pixels
        {
            return Some(CompletionPath::Stalled);
        }
        None
    }

    pub fn narrative_complete(&self, canvas: &Canvas, now: f64) -> bool {
        self.completion_path(canvas, now).is_some()
    }

    /// Evaluate the arc against the canvas and current signals.
    pub fn check_transition(&mut self, canvas: &Canvas, now: f64) -> Option<ArcTransition> {
        let narrative_complete = self.arc.phase() == ArcPhase::Resolving
            && self.narrative_complete(canvas, now);
        let inputs = ArcInputs {
            pixel_count: canvas.pixel_count(),
            coherence: self.coherence(),
            coherence_velocity: self.coherence.velocity(),
            narrative_complete,
        };
        self.arc.evaluate(&self.params.narrative, inputs, now)
    }

    #[cfg(test)]
    pub(crate) fn attention_mut(&mut self) -> &mut Attention {
        &mut self.attention
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dynamics/state.rs"]
mod tests;
