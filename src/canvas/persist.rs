//! Canvas state file.
//!
//! Saving serializes the whole canvas to JSON and atomically replaces the target. Loading never
//! fails: the document is walked field by field, anything invalid is skipped and reported in a
//! [`LoadReport`], and an unreadable or non-object document yields a fresh canvas.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::Canvas;
use crate::dynamics::attention::Attention;
use crate::dynamics::eisv::{E_RANGE, Eisv, I_RANGE, S_RANGE, V_RANGE};
use crate::dynamics::narrative::ArcPhase;
use crate::foundation::atomic_write::atomic_write;
use crate::foundation::core::{CanvasSize, Rgb8};
use crate::foundation::error::{EaselError, EaselResult};

pub const FORMAT_VERSION: u32 = 1;

/// On-disk record. Pixel keys are `"x,y"`.
#[derive(Debug, serde::Serialize)]
struct PersistedCanvas<'a> {
    version: u32,
    width: u32,
    height: u32,
    pixels: BTreeMap<String, [u8; 3]>,
    recent: Vec<[u32; 2]>,
    phase: ArcPhase,
    last_save_time: f64,
    last_clear_time: f64,
    paused_until: f64,
    drawings_saved: u64,
    mark_count: u64,
    era: &'a str,
    pending_era_switch: Option<&'a str>,
    satisfied: bool,
    curiosity: f64,
    engagement: f64,
    fatigue: f64,
    arc_phase: ArcPhase,
    coherence_history: &'a [f64],
    coherence_velocity: f64,
    intentionality_momentum: f64,
    eisv: Eisv,
}

/// How a load attempt went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// No file at the path.
    Missing,
    /// The file could not be read or was not a JSON object; a fresh canvas was returned.
    Discarded,
    /// The document was used, possibly with skipped fields.
    Loaded,
}

/// One skipped field or pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$.{}: {}", self.path, self.message)
    }
}

#[derive(Clone, Debug)]
pub struct LoadReport {
    pub status: LoadStatus,
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    fn new(status: LoadStatus) -> Self {
        Self {
            status,
            issues: Vec::new(),
        }
    }

    fn skip(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(LoadIssue {
            path: path.into(),
            message: message.into(),
        });
    }
}

impl Canvas {
    /// Serialize to JSON bytes.
    pub fn to_json_bytes(&self) -> EaselResult<Vec<u8>> {
        let pixels = self
            .pixels
            .iter()
            .map(|(&(x, y), c)| (format!("{x},{y}"), c.to_array()))
            .collect();
        let s = &self.session;
        let doc = PersistedCanvas {
            version: FORMAT_VERSION,
            width: self.size.width,
            height: self.size.height,
            pixels,
            recent: self.recent.iter().map(|&(x, y)| [x, y]).collect(),
            phase: self.phase,
            last_save_time: self.last_save_time,
            last_clear_time: self.last_clear_time,
            paused_until: self.paused_until,
            drawings_saved: self.drawings_saved,
            mark_count: self.mark_count,
            era: &self.era,
            pending_era_switch: self.pending_era_switch.as_deref(),
            satisfied: self.satisfied,
            curiosity: s.attention.curiosity,
            engagement: s.attention.engagement,
            fatigue: s.attention.fatigue,
            arc_phase: s.arc_phase,
            coherence_history: &s.coherence_history,
            coherence_velocity: s.coherence_velocity,
            intentionality_momentum: s.intentionality_momentum,
            eisv: s.eisv,
        };
        Ok(serde_json::to_vec(&doc)?)
    }

    /// Write the state file atomically (temp file + rename) and mark the canvas clean.
    #[tracing::instrument(skip(self), fields(pixels = self.pixels.len()))]
    pub fn save_to_disk(&mut self, path: &Path) -> EaselResult<()> {
        let bytes = self.to_json_bytes()?;
        atomic_write(path, &bytes).map_err(|e| {
            EaselError::persistence(format!("write '{}': {e}", path.display()))
        })?;
        self.mark_clean();
        debug!(bytes = bytes.len(), "canvas state saved");
        Ok(())
    }

    /// Load a state file, degrading to a fresh canvas on any document-level problem.
    #[tracing::instrument(skip(size, recent_capacity, default_era))]
    pub fn load_from_disk(
        path: &Path,
        size: CanvasSize,
        recent_capacity: usize,
        default_era: &str,
    ) -> (Self, LoadReport) {
        let fresh = || Self::new(size, recent_capacity, default_era);
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no canvas state file, starting fresh");
                return (fresh(), LoadReport::new(LoadStatus::Missing));
            }
            Err(e) => {
                warn!("canvas state unreadable, starting fresh: {e}");
                return (fresh(), LoadReport::new(LoadStatus::Discarded));
            }
        };
        let (canvas, report) = Self::from_json_slice(&bytes, size, recent_capacity, default_era);
        match report.status {
            LoadStatus::Loaded => {
                for issue in &report.issues {
                    warn!(%issue, "skipped persisted canvas field");
                }
                info!(
                    pixels = canvas.pixel_count(),
                    skipped = report.issues.len(),
                    "canvas state restored"
                );
            }
            _ => warn!("canvas state malformed, starting fresh"),
        }
        (canvas, report)
    }

    /// Lenient decode of a state document.
    pub fn from_json_slice(
        bytes: &[u8],
        size: CanvasSize,
        recent_capacity: usize,
        default_era: &str,
    ) -> (Self, LoadReport) {
        let mut canvas = Self::new(size, recent_capacity, default_era);
        let root = match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => map,
            _ => return (canvas, LoadReport::new(LoadStatus::Discarded)),
        };
        let mut report = LoadReport::new(LoadStatus::Loaded);
        let mut r = Reader {
            root: &root,
            report: &mut report,
        };

        if let Some(pixels) = r.object("pixels") {
            for (key, value) in pixels {
                let path = format!("pixels[\"{key}\"]");
                let Some((x, y)) = parse_coord(key, size) else {
                    r.report.skip(path, "bad or out-of-bounds coordinate key");
                    continue;
                };
                let Some(color) = parse_color(value) else {
                    r.report.skip(path, "color must be three integers in [0, 255]");
                    continue;
                };
                canvas.pixels.insert((x, y), color);
            }
        }

        if let Some(recent) = r.array("recent") {
            for (i, v) in recent.iter().enumerate() {
                match parse_pair(v, size) {
                    Some(p) => {
                        canvas.recent.push(p);
                    }
                    None => r.report.skip(format!("recent[{i}]"), "bad coordinate"),
                }
            }
        }

        if let Some(p) = r.phase("phase") {
            canvas.phase = p;
        }
        if let Some(t) = r.time("last_save_time") {
            canvas.last_save_time = t;
        }
        if let Some(t) = r.time("last_clear_time") {
            canvas.last_clear_time = t;
        }
        if let Some(t) = r.time("paused_until") {
            canvas.paused_until = t;
        }
        if let Some(n) = r.count("drawings_saved") {
            canvas.drawings_saved = n;
        }
        if let Some(n) = r.count("mark_count") {
            canvas.mark_count = n;
        }
        if let Some(s) = r.name("era") {
            canvas.era = s;
        }
        match root.get("pending_era_switch") {
            None | Some(Value::Null) => {}
            Some(_) => {
                if let Some(s) = r.name("pending_era_switch") {
                    canvas.pending_era_switch = Some(s);
                }
            }
        }
        if let Some(b) = r.flag("satisfied") {
            canvas.satisfied = b;
        }

        let session = &mut canvas.session;
        let defaults = Attention::default();
        session.attention = Attention {
            curiosity: r.unit("curiosity").unwrap_or(defaults.curiosity),
            engagement: r.unit("engagement").unwrap_or(defaults.engagement),
            fatigue: r.unit("fatigue").unwrap_or(defaults.fatigue),
        };
        if let Some(p) = r.phase("arc_phase") {
            session.arc_phase = p;
        }
        if let Some(hist) = r.array("coherence_history") {
            for (i, v) in hist.iter().enumerate() {
                match v.as_f64().filter(|c| (0.0..=1.0).contains(c)) {
                    Some(c) => session.coherence_history.push(c),
                    None => r
                        .report
                        .skip(format!("coherence_history[{i}]"), "must be a number in [0, 1]"),
                }
            }
        }
        if let Some(v) = r.float_in("coherence_velocity", -1.0, 1.0) {
            session.coherence_velocity = v;
        }
        if let Some(m) = r.unit("intentionality_momentum") {
            session.intentionality_momentum = m;
        }
        if let Some(eisv) = r.eisv("eisv") {
            session.eisv = eisv;
        }
        // The arc is authoritative for the mirrored label.
        canvas.phase = canvas.session.arc_phase;

        canvas.dirty = false;
        (canvas, report)
    }
}

/// Typed accessors over the root object that record a [`LoadIssue`] on mismatch.
struct Reader<'a> {
    root: &'a Map<String, Value>,
    report: &'a mut LoadReport,
}

impl<'a> Reader<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.root.get(key)
    }

    fn object(&mut self, key: &str) -> Option<&'a Map<String, Value>> {
        match self.get(key)? {
            Value::Object(m) => Some(m),
            _ => {
                self.report.skip(key, "expected an object");
                None
            }
        }
    }

    fn array(&mut self, key: &str) -> Option<&'a Vec<Value>> {
        match self.get(key)? {
            Value::Array(a) => Some(a),
            _ => {
                self.report.skip(key, "expected an array");
                None
            }
        }
    }

    fn float_in(&mut self, key: &str, lo: f64, hi: f64) -> Option<f64> {
        let v = self.get(key)?;
        match v.as_f64().filter(|x| x.is_finite() && (lo..=hi).contains(x)) {
            Some(x) => Some(x),
            None => {
                self.report
                    .skip(key, format!("expected a number in [{lo}, {hi}]"));
                None
            }
        }
    }

    fn unit(&mut self, key: &str) -> Option<f64> {
        self.float_in(key, 0.0, 1.0)
    }

    fn time(&mut self, key: &str) -> Option<f64> {
        self.float_in(key, 0.0, f64::MAX)
    }

    fn count(&mut self, key: &str) -> Option<u64> {
        let v = self.get(key)?;
        match v.as_u64() {
            Some(n) => Some(n),
            None => {
                self.report.skip(key, "expected a non-negative integer");
                None
            }
        }
    }

    fn flag(&mut self, key: &str) -> Option<bool> {
        let v = self.get(key)?;
        match v.as_bool() {
            Some(b) => Some(b),
            None => {
                self.report.skip(key, "expected a boolean");
                None
            }
        }
    }

    fn name(&mut self, key: &str) -> Option<String> {
        let v = self.get(key)?;
        match v.as_str().map(str::trim).filter(|s| !s.is_empty() && s.len() <= 64) {
            Some(s) => Some(s.to_string()),
            None => {
                self.report.skip(key, "expected a non-empty name");
                None
            }
        }
    }

    fn phase(&mut self, key: &str) -> Option<ArcPhase> {
        let v = self.get(key)?;
        match v.as_str().and_then(ArcPhase::parse) {
            Some(p) => Some(p),
            None => {
                self.report.skip(key, "unknown arc phase");
                None
            }
        }
    }

    fn eisv(&mut self, key: &str) -> Option<Eisv> {
        let obj = self.object(key)?;
        let field = |name: &str, lo: f64, hi: f64| {
            obj.get(name)
                .and_then(Value::as_f64)
                .filter(|x| x.is_finite() && (lo..=hi).contains(x))
        };
        match (
            field("e", E_RANGE.0, E_RANGE.1),
            field("i", I_RANGE.0, I_RANGE.1),
            field("s", S_RANGE.0, S_RANGE.1),
            field("v", V_RANGE.0, V_RANGE.1),
        ) {
            (Some(e), Some(i), Some(s), Some(v)) => Some(Eisv { e, i, s, v }),
            _ => {
                self.report.skip(key, "eisv fields missing or out of range");
                None
            }
        }
    }
}

fn parse_coord(key: &str, size: CanvasSize) -> Option<(u32, u32)> {
    let (xs, ys) = key.split_once(',')?;
    let x: i64 = xs.trim().parse().ok()?;
    let y: i64 = ys.trim().parse().ok()?;
    size.contains(x, y).then_some((x as u32, y as u32))
}

fn parse_pair(v: &Value, size: CanvasSize) -> Option<(u32, u32)> {
    let arr = v.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    let x = arr[0].as_i64()?;
    let y = arr[1].as_i64()?;
    size.contains(x, y).then_some((x as u32, y as u32))
}

fn parse_color(v: &Value) -> Option<Rgb8> {
    let arr = v.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    let mut ch = [0u8; 3];
    for (slot, c) in ch.iter_mut().zip(arr) {
        *slot = u8::try_from(c.as_u64()?).ok()?;
    }
    Some(Rgb8::from(ch))
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/persist.rs"]
mod tests;
