#![forbid(unsafe_code)]

pub mod canvas;
pub mod config;
pub mod dynamics;
pub mod engine;
pub mod felt;
pub mod foundation;
pub mod strategy;

pub use canvas::Canvas;
pub use canvas::persist::{LoadIssue, LoadReport, LoadStatus};
pub use config::EngineConfig;
pub use dynamics::{ArcPhase, CompletionPath, DynamicalState, Eisv};
pub use engine::{
    AutonomyOutcome, CompletionEvent, CompletionObserver, CompletionReason, DrawingEngine,
    EraSwitch, TickAction, TickOutcome,
};
pub use felt::{FeltState, LightRegime};
pub use foundation::clock::{Clock, ManualClock, SystemClock};
pub use foundation::core::{CanvasSize, Quadrant, Rgb8};
pub use foundation::error::{EaselError, EaselResult};
pub use strategy::{MarkStrategy, SessionGoal, StrategyRegistry, StrategyState};
