//! The continuous/discrete hybrid state advanced once per accepted mark.
//!
//! - [`eisv`]: the four-variable differential system and `C(V)`.
//! - [`attention`]: curiosity, engagement, fatigue and the derived energy signal.
//! - [`coherence`]: bounded coherence history and its smoothed velocity.
//! - [`narrative`]: the `opening -> developing -> resolving -> closing` arc.
//! - [`state`]: [`DynamicalState`], which owns all of the above and decides completion.

pub mod attention;
pub mod coherence;
pub mod eisv;
pub mod narrative;
pub mod state;

pub use attention::Attention;
pub use eisv::{Eisv, MarkSignals};
pub use narrative::{ArcPhase, ArcTransition};
pub use state::{CompletionPath, DynamicalState, DynamicsParams, SessionSnapshot};
