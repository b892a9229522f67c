use crate::dynamics::state::DynamicalState;
use crate::foundation::core::{CanvasSize, Point};
use crate::strategy::{SessionGoal, StrategyState};

/// Where the next mark goes and the state that decides how it looks.
#[derive(Debug)]
pub struct DrawingIntent {
    pub(crate) focus: Point,
    pub(crate) heading: f64,
    pub(crate) marks: u64,
    pub(crate) dynamics: DynamicalState,
    pub(crate) era_state: Box<dyn StrategyState>,
}

impl DrawingIntent {
    /// Focus starts at the goal's start quadrant, or the canvas center.
    pub fn new(
        size: CanvasSize,
        goal: &SessionGoal,
        dynamics: DynamicalState,
        era_state: Box<dyn StrategyState>,
    ) -> Self {
        let focus = goal
            .start_quadrant
            .map_or_else(|| size.center(), |q| size.quadrant_center(q));
        Self {
            focus,
            heading: 0.0,
            marks: 0,
            dynamics,
            era_state,
        }
    }

    pub fn focus(&self) -> Point {
        self.focus
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Marks made this session.
    pub fn marks(&self) -> u64 {
        self.marks
    }

    pub fn dynamics(&self) -> &DynamicalState {
        &self.dynamics
    }

    pub fn era_state(&self) -> &dyn StrategyState {
        self.era_state.as_ref()
    }
}
