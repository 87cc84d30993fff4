use serde::{Deserialize, Serialize};

use crate::errors::{JarvisError, JarvisResult};

pub const DEFAULT_STEP_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Click,
    Type,
    Enter,
    Wait,
    Scroll,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Click => "click",
            ActionType::Type => "type",
            ActionType::Enter => "enter",
            ActionType::Wait => "wait",
            ActionType::Scroll => "scroll",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute screen coordinate in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

/// One planned action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub action_type: ActionType,
    /// Natural-language name of the element to act on. Ignored for `Wait`.
    #[serde(default)]
    pub target_description: String,
    /// Text to type for `Type`; signed line count for `Scroll`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Pre-resolved point; bypasses perception and matching when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<ScreenPoint>,
    /// Sleep duration for `Wait`, per-call deadline for everything else.
    #[serde(rename = "timeout", default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_STEP_TIMEOUT_SECS
}

impl WorkflowStep {
    fn new(action_type: ActionType, target: &str) -> Self {
        Self {
            action_type,
            target_description: target.to_string(),
            value: None,
            coordinates: None,
            timeout_seconds: DEFAULT_STEP_TIMEOUT_SECS,
        }
    }

    pub fn click(target: &str) -> Self {
        Self::new(ActionType::Click, target)
    }

    pub fn type_text(target: &str, value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::new(ActionType::Type, target)
        }
    }

    pub fn enter(target: &str) -> Self {
        Self::new(ActionType::Enter, target)
    }

    pub fn scroll(target: &str, lines: i32) -> Self {
        Self {
            value: Some(lines.to_string()),
            ..Self::new(ActionType::Scroll, target)
        }
    }

    /// `note` is kept as the description for logging only.
    pub fn wait(note: &str, seconds: u64) -> Self {
        Self {
            timeout_seconds: seconds,
            ..Self::new(ActionType::Wait, note)
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.coordinates = Some(ScreenPoint { x, y });
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn validate(&self) -> JarvisResult<()> {
        match self.action_type {
            ActionType::Wait => {
                if self.timeout_seconds == 0 {
                    return Err(JarvisError::Workflow(
                        "wait step requires a positive timeout".into(),
                    ));
                }
            }
            ActionType::Type => {
                if self.value.as_deref().map_or(true, str::is_empty) {
                    return Err(JarvisError::Workflow(format!(
                        "type step \"{}\" requires a non-empty value",
                        self.target_description
                    )));
                }
                self.require_target()?;
            }
            ActionType::Click | ActionType::Enter | ActionType::Scroll => self.require_target()?,
        }
        Ok(())
    }

    fn require_target(&self) -> JarvisResult<()> {
        if self.target_description.trim().is_empty() && self.coordinates.is_none() {
            return Err(JarvisError::Workflow(format!(
                "{} step requires a target description",
                self.action_type
            )));
        }
        Ok(())
    }

    /// One-line rendering used by the CLI, events, logs and history. Typed
    /// text is reduced to its length.
    pub fn summary(&self) -> String {
        match (self.action_type, &self.value) {
            (ActionType::Wait, _) => format!("wait {}s", self.timeout_seconds),
            (ActionType::Type, Some(v)) => {
                format!("type {} chars into \"{}\"", v.chars().count(), self.target_description)
            }
            (action, _) => format!("{} \"{}\"", action, self.target_description),
        }
    }
}

/// Ordered action sequence produced for one instruction. Deserializing goes
/// through [`Plan::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WorkflowStep>", into = "Vec<WorkflowStep>")]
pub struct Plan {
    steps: Vec<WorkflowStep>,
}

impl Plan {
    /// Builds a plan, rejecting any step that breaks the step invariants.
    pub fn new(steps: Vec<WorkflowStep>) -> JarvisResult<Self> {
        for (i, step) in steps.iter().enumerate() {
            step.validate()
                .map_err(|e| JarvisError::Workflow(format!("step {}: {e}", i + 1)))?;
        }
        Ok(Self { steps })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Skips validation; callers derive the steps from an already valid plan.
    pub(crate) fn from_steps_unchecked(steps: Vec<WorkflowStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkflowStep> {
        self.steps.iter()
    }
}

impl TryFrom<Vec<WorkflowStep>> for Plan {
    type Error = JarvisError;

    fn try_from(steps: Vec<WorkflowStep>) -> JarvisResult<Self> {
        Self::new(steps)
    }
}

impl From<Plan> for Vec<WorkflowStep> {
    fn from(plan: Plan) -> Self {
        plan.steps
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a WorkflowStep;
    type IntoIter = std::slice::Iter<'a, WorkflowStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
