//! Sensed input to the drawing loop.

use std::fmt;

use crate::config::LightParams;
use crate::foundation::math::unit_or;

/// The four-scalar felt state plus an optional light reading.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeltState {
    pub warmth: f64,
    pub clarity: f64,
    pub stability: f64,
    pub presence: f64,
    /// Ambient light in lux, if a sensor is present.
    pub ambient_lux: Option<f64>,
    /// The device's own light output in `[0, 1]`.
    pub self_glow: f64,
}

impl Default for FeltState {
    fn default() -> Self {
        Self {
            warmth: 0.5,
            clarity: 0.5,
            stability: 0.5,
            presence: 0.5,
            ambient_lux: None,
            self_glow: 0.0,
        }
    }
}

impl FeltState {
    pub fn new(warmth: f64, clarity: f64, stability: f64, presence: f64) -> Self {
        Self {
            warmth,
            clarity,
            stability,
            presence,
            ..Self::default()
        }
        .sanitized()
    }

    pub fn with_light(mut self, ambient_lux: Option<f64>, self_glow: f64) -> Self {
        self.ambient_lux = ambient_lux;
        self.self_glow = self_glow;
        self.sanitized()
    }

    /// Scalars clamped into `[0, 1]`; non-finite values become 0.5. A non-finite lux reading is
    /// dropped.
    pub fn sanitized(self) -> Self {
        Self {
            warmth: unit_or(self.warmth, 0.5),
            clarity: unit_or(self.clarity, 0.5),
            stability: unit_or(self.stability, 0.5),
            presence: unit_or(self.presence, 0.5),
            ambient_lux: self.ambient_lux.filter(|l| l.is_finite()).map(|l| l.max(0.0)),
            self_glow: unit_or(self.self_glow, 0.5),
        }
    }

    /// `0.5 + 0.5 * (0.6*presence + 0.4*warmth)`, in `[0.5, 1]`.
    pub fn expression_intensity(&self) -> f64 {
        0.5 + 0.5 * (0.6 * self.presence + 0.4 * self.warmth)
    }

    pub fn light_regime(&self, p: &LightParams) -> LightRegime {
        LightRegime::from_reading(self.ambient_lux, self.self_glow, p)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightRegime {
    Dark,
    #[default]
    Dim,
    Bright,
}

impl LightRegime {
    /// Threshold the reading after subtracting the light the device itself emits.
    pub fn from_reading(lux: Option<f64>, self_glow: f64, p: &LightParams) -> Self {
        let Some(lux) = lux.filter(|l| l.is_finite()) else {
            return Self::Dim;
        };
        let corrected = lux - unit_or(self_glow, 0.0) * p.glow_lux_at_full;
        if corrected < p.dark_lux {
            Self::Dark
        } else if corrected < p.dim_lux {
            Self::Dim
        } else {
            Self::Bright
        }
    }
}

impl fmt::Display for LightRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dark => "dark",
            Self::Dim => "dim",
            Self::Bright => "bright",
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/felt.rs"]
mod tests;
