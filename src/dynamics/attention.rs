use crate::config::AttentionParams;
use crate::dynamics::narrative::ArcPhase;
use crate::foundation::math::{ema, unit_or};

/// Curiosity, engagement and fatigue, all in `[0, 1]`.
///
/// Fatigue only ever rises within a session; [`Attention::default`] is the fresh-session state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Attention {
    pub curiosity: f64,
    pub engagement: f64,
    pub fatigue: f64,
}

impl Default for Attention {
    fn default() -> Self {
        Self {
            curiosity: 1.0,
            engagement: 0.5,
            fatigue: 0.0,
        }
    }
}

impl Attention {
    /// Per-mark update.
    ///
    /// `coherence` is the post-step `C`; `switched` is whether this mark changed gesture.
    pub fn update(
        &mut self,
        p: &AttentionParams,
        phase: ArcPhase,
        coherence: f64,
        intentionality: f64,
        entropy: f64,
        switched: bool,
    ) {
        let c = unit_or(coherence, 0.0);
        let delta = if phase == ArcPhase::Resolving {
            // Only drain while resolving so an oscillating, high-coherence session still exhausts.
            -p.resolving_drain
        } else if c < p.explore_coherence {
            -p.curiosity_drain * (1.0 - c)
        } else {
            p.curiosity_regen * c
        };
        self.curiosity = unit_or(self.curiosity + delta, 0.0);

        let target = unit_or(intentionality, 0.0) * (1.0 - 0.5 * unit_or(entropy, 0.0));
        self.engagement = unit_or(ema(self.engagement, target, p.engagement_alpha), 0.0);

        let mut fatigue = self.fatigue + p.fatigue_per_mark;
        if switched {
            fatigue += p.fatigue_per_switch;
        }
        self.fatigue = unit_or(fatigue.max(self.fatigue), self.fatigue);
    }

    /// `(0.6*curiosity + 0.4*engagement) * (1 - 0.5*fatigue)`.
    ///
    /// The only energy signal exposed to mark-frequency modulation; it is derived, never depleted.
    pub fn derived_energy(&self) -> f64 {
        ((0.6 * self.curiosity + 0.4 * self.engagement) * (1.0 - 0.5 * self.fatigue)).clamp(0.0, 1.0)
    }

    /// Curiosity is spent and either engagement faded or fatigue is high.
    pub fn exhausted(&self, curiosity_below: f64, engagement_below: f64, fatigue_above: f64) -> bool {
        self.curiosity < curiosity_below
            && (self.engagement < engagement_below || self.fatigue > fatigue_above)
    }

    pub(crate) fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            curiosity: unit_or(self.curiosity, d.curiosity),
            engagement: unit_or(self.engagement, d.engagement),
            fatigue: unit_or(self.fatigue, d.fatigue),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dynamics/attention.rs"]
mod tests;
