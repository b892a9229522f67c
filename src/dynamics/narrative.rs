use std::fmt;

use crate::config::NarrativeParams;
use crate::foundation::math::{ema, unit_or};

/// Discrete narrative phase layered over the continuous signals.
///
/// `Closing` is terminal until the session is reset.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ArcPhase {
    #[default]
    Opening,
    Developing,
    Resolving,
    Closing,
}

impl ArcPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Developing => "developing",
            Self::Resolving => "resolving",
            Self::Closing => "closing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "opening" => Some(Self::Opening),
            "developing" => Some(Self::Developing),
            "resolving" => Some(Self::Resolving),
            "closing" => Some(Self::Closing),
            _ => None,
        }
    }
}

impl fmt::Display for ArcPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A phase change produced by [`NarrativeArc::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArcTransition {
    pub from: ArcPhase,
    pub to: ArcPhase,
}

/// Signals the arc needs to decide a transition.
#[derive(Clone, Copy, Debug)]
pub struct ArcInputs {
    pub pixel_count: usize,
    pub coherence: f64,
    pub coherence_velocity: f64,
    /// Result of the completion check; only consulted while resolving.
    pub narrative_complete: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NarrativeArc {
    phase: ArcPhase,
    phase_marks: u64,
    phase_started_at: f64,
    momentum: f64,
}

impl NarrativeArc {
    pub fn new(now: f64) -> Self {
        Self {
            phase: ArcPhase::Opening,
            phase_marks: 0,
            phase_started_at: now,
            momentum: 0.0,
        }
    }

    /// Resume a persisted phase; the phase clock restarts at `now`.
    pub fn restore(phase: ArcPhase, momentum: f64, now: f64) -> Self {
        Self {
            phase,
            phase_marks: 0,
            phase_started_at: now,
            momentum: unit_or(momentum, 0.0),
        }
    }

    pub fn phase(&self) -> ArcPhase {
        self.phase
    }

    pub fn phase_marks(&self) -> u64 {
        self.phase_marks
    }

    pub fn phase_started_at(&self) -> f64 {
        self.phase_started_at
    }

    /// Smoothed intentionality.
    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    pub(crate) fn record_mark(&mut self, intentionality: f64, alpha: f64) {
        self.phase_marks = self.phase_marks.saturating_add(1);
        self.momentum = unit_or(ema(self.momentum, unit_or(intentionality, 0.0), alpha), 0.0);
    }

    /// Apply at most one transition.
    ///
    /// Only adjacent moves exist, so `opening` can never jump to `resolving` or `closing`.
    pub fn evaluate(
        &mut self,
        p: &NarrativeParams,
        inputs: ArcInputs,
        now: f64,
    ) -> Option<ArcTransition> {
        let next = self.next_phase(p, inputs)?;
        let from = self.phase;
        self.phase = next;
        self.phase_marks = 0;
        self.phase_started_at = now;
        Some(ArcTransition { from, to: next })
    }

    fn next_phase(&self, p: &NarrativeParams, x: ArcInputs) -> Option<ArcPhase> {
        if self.phase == ArcPhase::Closing {
            return None;
        }
        if x.pixel_count < p.fresh_canvas_pixels {
            return (self.phase != ArcPhase::Opening).then_some(ArcPhase::Opening);
        }
        match self.phase {
            ArcPhase::Opening => (self.momentum > p.develop_momentum
                && self.phase_marks >= p.develop_min_marks)
                .then_some(ArcPhase::Developing),
            ArcPhase::Developing => {
                if x.coherence > p.resolve_coherence
                    && x.coherence_velocity.abs() < p.resolve_max_velocity
                {
                    Some(ArcPhase::Resolving)
                } else if x.coherence < p.regress_coherence
                    && self.momentum < p.regress_momentum
                    && self.phase_marks >= p.regress_min_marks
                {
                    Some(ArcPhase::Opening)
                } else {
                    None
                }
            }
            ArcPhase::Resolving => {
                if x.narrative_complete {
                    Some(ArcPhase::Closing)
                } else if x.coherence < p.destabilize_coherence {
                    Some(ArcPhase::Developing)
                } else {
                    None
                }
            }
            ArcPhase::Closing => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dynamics/narrative.rs"]
mod tests;
