use serde::Serialize;

use crate::errors::ExecutionError;
use crate::workflow::types::{ActionType, ScreenPoint};
use crate::workflow::PlanSource;

/// Lifecycle states of a single plan step.
///
/// Wait steps go `Pending → Sleeping → Done`; everything else goes
/// `Pending → Capturing → Matching → Acting → Done`, or skips straight to
/// `Acting` when the step carries coordinates. `Failed` is terminal and
/// reachable from `Capturing`, `Matching` and `Acting`.
#[derive(Debug, Clone, PartialEq)]
pub enum StepState {
    Pending,
    Sleeping,
    Capturing,
    Matching { candidates: usize },
    Acting { point: ScreenPoint },
    Done,
    Failed(ExecutionError),
}

impl StepState {
    pub fn name(&self) -> &'static str {
        match self {
            StepState::Pending => "pending",
            StepState::Sleeping => "sleeping",
            StepState::Capturing => "capturing",
            StepState::Matching { .. } => "matching",
            StepState::Acting { .. } => "acting",
            StepState::Done => "done",
            StepState::Failed(_) => "failed",
        }
    }
}

/// Progress notifications published while an instruction runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
    PlanReady {
        source: PlanSource,
        steps: Vec<String>,
    },
    StepStarted {
        index: usize,
        action: ActionType,
        summary: String,
    },
    StateChanged {
        index: usize,
        state: &'static str,
    },
    StepDone {
        index: usize,
    },
    StepFailed {
        index: usize,
        reason: String,
    },
    Finished {
        success: bool,
        reason: Option<String>,
    },
}
