//! Generative fallback: asks a text-generation service for a JSON action list
//! and accepts it only if every step parses.
use std::sync::Arc;

use serde::Deserialize;

use crate::errors::{JarvisError, JarvisResult};
use crate::llm::provider::LlmProvider;
use crate::llm::types::GenerationOptions;
use crate::workflow::types::{ActionType, Plan, WorkflowStep, DEFAULT_STEP_TIMEOUT_SECS};

const PLAN_TEMPLATE: &str = r#"You are a desktop automation assistant. Convert the user request into a JSON workflow for UI automation.

Rules:
- Use ONLY these action_type values: "click", "type", "enter", "wait"
- Every click, type and enter step needs a "target_description" naming a visible UI element (button, text field, icon)
- "type" steps must include a "value" field with the text to type
- "wait" steps take a "timeout" field in whole seconds (1-5)
- Be specific about UI elements ("search button", "username field")
- Return ONLY a JSON array, no other text

Example:
User: "Open Spotify and play music"
[
  {"action_type": "click", "target_description": "Spotify"},
  {"action_type": "wait", "timeout": 2},
  {"action_type": "click", "target_description": "search bar"},
  {"action_type": "type", "target_description": "search input", "value": "music"},
  {"action_type": "enter", "target_description": "search input"},
  {"action_type": "click", "target_description": "play button"}
]

User request:"#;

#[derive(Debug, Deserialize)]
struct RawStep {
    action_type: String,
    target_description: Option<String>,
    value: Option<String>,
    timeout: Option<u64>,
}

pub struct GenerativePlanner {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl GenerativePlanner {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    /// Empty plan on any failure: transport, extraction or parsing.
    pub async fn generate(&self, instruction: &str) -> Plan {
        let prompt = build_prompt(instruction);
        let response = match self.provider.complete(&prompt, &self.options).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(provider = %self.provider.name(), error = %e, "generation request failed");
                String::new()
            }
        };

        match parse_response(&response) {
            Ok(plan) => {
                tracing::info!(steps = plan.len(), "generated plan accepted");
                plan
            }
            Err(e) => {
                tracing::warn!(error = %e, response_len = response.len(), "generated plan rejected");
                Plan::empty()
            }
        }
    }
}

pub fn build_prompt(instruction: &str) -> String {
    format!("{PLAN_TEMPLATE} {instruction}\n\nJSON:")
}

/// Slice from the first `[` to the last `]`, inclusive.
pub fn extract_json_array(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    (end > start).then(|| &response[start..=end])
}

/// All-or-nothing parse of a model response into a plan.
pub fn parse_response(response: &str) -> JarvisResult<Plan> {
    let json = extract_json_array(response)
        .ok_or_else(|| JarvisError::Workflow("no JSON array in response".into()))?;
    let raw: Vec<RawStep> = serde_json::from_str(json)?;

    let steps = raw
        .into_iter()
        .enumerate()
        .map(|(i, r)| convert_step(r).map_err(|e| JarvisError::Workflow(format!("step {}: {e}", i + 1))))
        .collect::<JarvisResult<Vec<_>>>()?;

    Plan::new(steps)
}

fn convert_step(raw: RawStep) -> JarvisResult<WorkflowStep> {
    let action_type = match raw.action_type.as_str() {
        "click" => ActionType::Click,
        "type" => ActionType::Type,
        "enter" => ActionType::Enter,
        "wait" => ActionType::Wait,
        other => {
            return Err(JarvisError::Workflow(format!("unknown action_type \"{other}\"")));
        }
    };

    let target_description = match (action_type, raw.target_description) {
        (ActionType::Wait, target) => target.unwrap_or_default(),
        (_, Some(target)) => target,
        (_, None) => {
            return Err(JarvisError::Workflow(format!(
                "{action_type} step is missing target_description"
            )));
        }
    };

    if action_type == ActionType::Type && raw.value.is_none() {
        return Err(JarvisError::Workflow("type step is missing value".into()));
    }

    Ok(WorkflowStep {
        action_type,
        target_description,
        value: raw.value,
        coordinates: None,
        timeout_seconds: raw.timeout.unwrap_or(DEFAULT_STEP_TIMEOUT_SECS),
    })
}
