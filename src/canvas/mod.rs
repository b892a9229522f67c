//! The persistent drawing surface.
//!
//! A sparse pixel map plus the session metadata that has to survive a restart. Persistence lives
//! in [`persist`], raster export in [`export`].

use std::collections::HashMap;

use crate::dynamics::narrative::ArcPhase;
use crate::dynamics::state::{RECENT_COHERENCE_WINDOW, SessionSnapshot};
use crate::foundation::clock::elapsed_secs;
use crate::foundation::core::{CanvasSize, Quadrant, Rgb8};
use crate::foundation::math::{band_score, mean};
use crate::foundation::ring::Ring;

pub mod export;
pub mod persist;

/// Below this many pixels composition scoring reports 0.
pub const MIN_PIXELS_FOR_COMPOSITION: usize = 50;

const DENSITY_BAND: (f64, f64) = (0.05, 0.25);
const QUADRANT_BAND: (f64, f64) = (0.10, 0.50);

/// Sparse pixel canvas with crash-safe session metadata.
#[derive(Clone, Debug)]
pub struct Canvas {
    size: CanvasSize,
    pixels: HashMap<(u32, u32), Rgb8>,
    recent: Ring<(u32, u32)>,
    phase: ArcPhase,
    last_save_time: f64,
    last_clear_time: f64,
    drawings_saved: u64,
    mark_count: u64,
    era: String,
    pending_era_switch: Option<String>,
    paused_until: f64,
    satisfied: bool,
    dirty: bool,
    session: SessionSnapshot,
}

impl Canvas {
    /// Empty canvas. Not paused, never saved.
    pub fn new(size: CanvasSize, recent_capacity: usize, era: impl Into<String>) -> Self {
        Self {
            size,
            pixels: HashMap::new(),
            recent: Ring::new(recent_capacity),
            phase: ArcPhase::Opening,
            last_save_time: 0.0,
            last_clear_time: 0.0,
            drawings_saved: 0,
            mark_count: 0,
            era: era.into(),
            pending_era_switch: None,
            paused_until: 0.0,
            satisfied: false,
            dirty: false,
            session: SessionSnapshot::default(),
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        self.pixels.get(&(x, y)).copied()
    }

    /// All stored pixels in no particular order.
    pub fn pixels(&self) -> impl Iterator<Item = ((u32, u32), Rgb8)> + '_ {
        self.pixels.iter().map(|(&k, &c)| (k, c))
    }

    /// Newest-last recent coordinates.
    pub fn recent(&self) -> Vec<(u32, u32)> {
        self.recent.to_vec()
    }

    /// Bounds-checked write. Returns `false` (and changes nothing) when out of bounds.
    ///
    /// A successful write marks the canvas dirty and clears the satisfied flag.
    pub fn draw_pixel(&mut self, x: i64, y: i64, color: Rgb8) -> bool {
        if !self.size.contains(x, y) {
            return false;
        }
        let key = (x as u32, y as u32);
        self.pixels.insert(key, color);
        self.recent.push(key);
        self.dirty = true;
        self.satisfied = false;
        true
    }

    /// Empty the canvas for a new session and open a short drawing pause.
    ///
    /// Counters that span sessions (`drawings_saved`, `last_save_time`) are kept.
    pub fn clear(&mut self, now: f64, pause_secs: f64) {
        self.pixels.clear();
        self.recent.clear();
        self.phase = ArcPhase::Opening;
        self.mark_count = 0;
        self.satisfied = false;
        self.last_clear_time = now;
        self.paused_until = now + pause_secs.max(0.0);
        self.session = SessionSnapshot::default();
        self.dirty = true;
    }

    /// `true` while inside the post-clear pause. A clock that moved backwards ends the pause.
    pub fn is_drawing_paused(&self, now: f64) -> bool {
        match elapsed_secs(self.last_clear_time, now) {
            Some(_) => now < self.paused_until,
            None => false,
        }
    }

    /// Compositional score in `[0, 1]` using the mirrored coherence history.
    ///
    /// 0 when fewer than [`MIN_PIXELS_FOR_COMPOSITION`] pixels exist.
    pub fn compositional_satisfaction(&self) -> f64 {
        let recent = self
            .session
            .coherence_history
            .iter()
            .rev()
            .take(RECENT_COHERENCE_WINDOW)
            .copied()
            .collect::<Vec<_>>();
        self.composition_score(mean(&recent))
    }

    /// `0.4*density + 0.3*quadrant_balance + 0.3*coherence`; coherence defaults to 0.5.
    pub fn composition_score(&self, recent_coherence: Option<f64>) -> f64 {
        let n = self.pixels.len();
        if n < MIN_PIXELS_FOR_COMPOSITION {
            return 0.0;
        }

        let occupancy = n as f64 / self.size.area() as f64;
        let (lo, hi) = DENSITY_BAND;
        let density = band_score(occupancy, lo, hi, lo, hi);

        let mut counts = [0usize; 4];
        for &(x, y) in self.pixels.keys() {
            counts[self.size.quadrant_of(x, y).index()] += 1;
        }
        let (qlo, qhi) = QUADRANT_BAND;
        let balance = Quadrant::ALL
            .iter()
            .map(|q| {
                let share = counts[q.index()] as f64 / n as f64;
                band_score(share, qlo, qhi, qlo, 1.0 - qhi)
            })
            .sum::<f64>()
            / 4.0;

        let coherence = recent_coherence
            .filter(|c| c.is_finite())
            .map_or(0.5, |c| c.clamp(0.0, 1.0));

        (0.4 * density + 0.3 * balance + 0.3 * coherence).clamp(0.0, 1.0)
    }

    pub fn phase(&self) -> ArcPhase {
        self.phase
    }

    pub fn last_save_time(&self) -> f64 {
        self.last_save_time
    }

    pub fn last_clear_time(&self) -> f64 {
        self.last_clear_time
    }

    pub fn drawings_saved(&self) -> u64 {
        self.drawings_saved
    }

    pub fn mark_count(&self) -> u64 {
        self.mark_count
    }

    pub fn era(&self) -> &str {
        &self.era
    }

    pub fn pending_era_switch(&self) -> Option<&str> {
        self.pending_era_switch.as_deref()
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    /// Unpersisted changes exist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn session(&self) -> &SessionSnapshot {
        &self.session
    }

    pub(crate) fn mark_satisfied(&mut self) {
        self.satisfied = true;
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn record_save(&mut self, now: f64) {
        self.drawings_saved = self.drawings_saved.saturating_add(1);
        self.last_save_time = now;
        self.dirty = true;
    }

    pub(crate) fn set_era(&mut self, era: impl Into<String>) {
        self.era = era.into();
        self.dirty = true;
    }

    pub(crate) fn set_pending_era_switch(&mut self, era: Option<String>) {
        self.pending_era_switch = era;
        self.dirty = true;
    }

    /// Mirror per-mark counters and the dynamical snapshot.
    pub(crate) fn mirror_session(&mut self, mark_count: u64, snapshot: SessionSnapshot) {
        self.mark_count = mark_count;
        self.phase = snapshot.arc_phase;
        self.session = snapshot;
        self.dirty = true;
    }

    pub(crate) fn set_phase(&mut self, phase: ArcPhase) {
        self.phase = phase;
        self.session.arc_phase = phase;
        self.dirty = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/canvas.rs"]
mod tests;
