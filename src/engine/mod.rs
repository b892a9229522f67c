//! The tick-driven orchestrator and its collaborators.

pub mod drawing_engine;
pub mod hooks;
pub mod intent;

pub use drawing_engine::{
    AutonomyOutcome, DrawingEngine, EraSwitch, MarkReport, TickAction, TickOutcome,
};
pub use hooks::{CompletionEvent, CompletionObserver, CompletionReason};
pub use intent::DrawingIntent;
