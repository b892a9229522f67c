//! Best-effort completion observers.

use std::fmt;
use std::path::PathBuf;

use tracing::warn;

use crate::dynamics::state::CompletionPath;
use crate::foundation::error::EaselResult;

/// Why a drawing was saved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// An external "finished" signal arrived recently.
    FinishedSignal,
    /// One of the narrative exit paths held.
    Narrative(CompletionPath),
    /// The caller reset the session.
    Reset,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FinishedSignal => f.write_str("finished_signal"),
            Self::Narrative(p) => write!(f, "narrative:{p}"),
            Self::Reset => f.write_str("reset"),
        }
    }
}

/// Summary of a saved drawing, delivered to every observer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CompletionEvent {
    pub pixel_count: usize,
    pub mark_count: u64,
    pub coherence: f64,
    pub compositional_satisfaction: f64,
    pub reason: CompletionReason,
    /// `None` when no drawings directory is configured.
    pub image_path: Option<PathBuf>,
    pub era: String,
}

/// Receives completion events. Errors are logged and never affect the session.
pub trait CompletionObserver: Send {
    fn on_completion(&mut self, event: &CompletionEvent) -> EaselResult<()>;
}

impl<F> CompletionObserver for F
where
    F: FnMut(&CompletionEvent) -> EaselResult<()> + Send,
{
    fn on_completion(&mut self, event: &CompletionEvent) -> EaselResult<()> {
        self(event)
    }
}

/// Deliver `event` to each observer, logging failures.
pub(crate) fn notify_all(observers: &mut [Box<dyn CompletionObserver>], event: &CompletionEvent) {
    for (index, obs) in observers.iter_mut().enumerate() {
        if let Err(err) = obs.on_completion(event) {
            warn!(index, %err, "completion observer failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/hooks.rs"]
mod tests;
