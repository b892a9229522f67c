use crate::foundation::math::{ema, mean, unit_or, variance};
use crate::foundation::ring::Ring;

/// Bounded coherence history with a smoothed first difference.
#[derive(Clone, Debug, PartialEq)]
pub struct CoherenceTracker {
    history: Ring<f64>,
    velocity: f64,
}

impl CoherenceTracker {
    pub fn new(cap: usize) -> Self {
        Self {
            history: Ring::new(cap),
            velocity: 0.0,
        }
    }

    /// Restore from persisted samples; non-finite samples are dropped, the rest clamped to `[0, 1]`.
    pub fn restore(cap: usize, samples: &[f64], velocity: f64) -> Self {
        let history = Ring::from_iter_capped(
            cap,
            samples
                .iter()
                .copied()
                .filter(|c| c.is_finite())
                .map(|c| c.clamp(0.0, 1.0)),
        );
        Self {
            history,
            velocity: if velocity.is_finite() {
                velocity.clamp(-1.0, 1.0)
            } else {
                0.0
            },
        }
    }

    pub fn record(&mut self, c: f64, smoothing: f64) {
        let c = unit_or(c, 0.0);
        if let Some(&prev) = self.history.last() {
            self.velocity = ema(self.velocity, c - prev, smoothing);
        }
        self.history.push(c);
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn samples(&self) -> Vec<f64> {
        self.history.to_vec()
    }

    /// Mean of the newest `window` samples.
    pub fn recent_mean(&self, window: usize) -> Option<f64> {
        let tail: Vec<f64> = self.history.tail(window).copied().collect();
        mean(&tail)
    }

    /// At least `min_samples` recorded, and the newest `window` are high and quiet.
    pub fn settled(&self, min_samples: usize, window: usize, mean_above: f64, var_below: f64) -> bool {
        if self.history.len() < min_samples {
            return false;
        }
        let tail: Vec<f64> = self.history.tail(window).copied().collect();
        match (mean(&tail), variance(&tail)) {
            (Some(m), Some(v)) => m > mean_above && v < var_below,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dynamics/coherence.rs"]
mod tests;
