use rand::{Rng, RngCore};

use crate::felt::FeltState;
use crate::foundation::core::Quadrant;

/// How much of the canvas the session aims to cover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageTarget {
    Sparse,
    #[default]
    Moderate,
    Dense,
}

/// Advisory biases fixed for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionGoal {
    /// Hue offset toward warm (positive) or cool (negative), in `[-0.15, 0.15]`.
    pub warmth_bias: f64,
    pub coverage: CoverageTarget,
    /// Where the first marks go, if anywhere in particular.
    pub start_quadrant: Option<Quadrant>,
}

impl SessionGoal {
    pub fn from_felt(felt: &FeltState, rng: &mut dyn RngCore) -> Self {
        let felt = felt.sanitized();
        let coverage = if felt.clarity > 0.65 {
            CoverageTarget::Sparse
        } else if felt.presence > 0.6 {
            CoverageTarget::Dense
        } else {
            CoverageTarget::Moderate
        };
        let start_quadrant = (felt.stability < 0.5)
            .then(|| Quadrant::ALL[rng.random_range(0..Quadrant::ALL.len())]);
        Self {
            warmth_bias: (felt.warmth - 0.5) * 0.3,
            coverage,
            start_quadrant,
        }
    }

    /// Multiplier a strategy applies to mark size.
    pub fn coverage_scale(&self) -> f64 {
        match self.coverage {
            CoverageTarget::Sparse => 0.6,
            CoverageTarget::Moderate => 1.0,
            CoverageTarget::Dense => 1.5,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strategy/goal.rs"]
mod tests;
