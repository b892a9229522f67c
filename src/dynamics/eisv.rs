use crate::config::EisvParams;
use crate::foundation::math::{clamp_finite, unit_or};

pub const E_RANGE: (f64, f64) = (0.0, 1.0);
pub const I_RANGE: (f64, f64) = (0.0, 1.0);
pub const S_RANGE: (f64, f64) = (0.001, 2.0);
pub const V_RANGE: (f64, f64) = (-2.0, 2.0);

/// Energy / Intentionality / entropy (Sigma) / Void.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Eisv {
    pub e: f64,
    pub i: f64,
    pub s: f64,
    pub v: f64,
}

impl Default for Eisv {
    fn default() -> Self {
        Self {
            e: 0.5,
            i: 0.5,
            s: 0.2,
            v: 0.0,
        }
    }
}

/// Per-mark driving signals, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkSignals {
    /// How committed the current gesture run is.
    pub intentionality: f64,
    /// Normalized gesture entropy.
    pub entropy: f64,
    /// Gesture switch rate.
    pub drift: f64,
}

impl MarkSignals {
    pub fn new(intentionality: f64, entropy: f64, drift: f64) -> Self {
        Self {
            intentionality: unit_or(intentionality, 0.0),
            entropy: unit_or(entropy, 0.0),
            drift: unit_or(drift, 0.0),
        }
    }
}

/// `C(V) = c_max * 0.5 * (1 + tanh(c1 * V))`; strictly increasing in `V`, bounded in `(0, c_max)`.
pub fn coherence(v: f64, p: &EisvParams) -> f64 {
    p.c_max * 0.5 * (1.0 + (p.c1 * v).tanh())
}

impl Eisv {
    pub fn coherence(&self, p: &EisvParams) -> f64 {
        coherence(self.v, p)
    }

    /// One explicit Euler step followed by a clamp of every variable into its range.
    pub fn step(&mut self, sig: MarkSignals, p: &EisvParams) {
        let c = self.coherence(p);
        let drift2 = sig.drift * sig.drift;

        let de = p.alpha * (sig.intentionality - self.e) - p.beta_e * self.e * sig.entropy
            + p.gamma_e * drift2;
        let di = p.beta_i * c - p.k * sig.entropy - p.gamma_i * self.i;
        let ds = -p.mu * self.s + p.lambda1 * drift2 - p.lambda2 * c;
        let dv = p.kappa * (sig.intentionality - self.e) - p.delta * self.v;

        self.e += p.dt * de;
        self.i += p.dt * di;
        self.s += p.dt * ds;
        self.v += p.dt * dv;
        self.clamp();
    }

    pub(crate) fn clamp(&mut self) {
        self.e = clamp_finite(self.e, E_RANGE.0, E_RANGE.1);
        self.i = clamp_finite(self.i, I_RANGE.0, I_RANGE.1);
        self.s = clamp_finite(self.s, S_RANGE.0, S_RANGE.1);
        self.v = clamp_finite(self.v, V_RANGE.0, V_RANGE.1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dynamics/eisv.rs"]
mod tests;
