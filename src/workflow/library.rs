//! Static workflow table: canonical task phrase → pre-authored plan.
//!
//! Lookup is substring containment of the phrase in the lowercased
//! instruction; entries are scanned in insertion order and the first hit wins.
use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{JarvisError, JarvisResult};
use crate::workflow::types::{Plan, WorkflowStep};

#[derive(Debug, Clone, Default)]
pub struct WorkflowLibrary {
    entries: Vec<(String, Plan)>,
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    workflow: Vec<LibraryEntry>,
}

#[derive(Debug, Deserialize)]
struct LibraryEntry {
    phrase: String,
    steps: Vec<WorkflowStep>,
}

impl WorkflowLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three stock workflows, in lookup order.
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        lib.entries.push(("play music on spotify".into(), spotify_play_music()));
        lib.entries.push(("search web".into(), open_browser_search()));
        lib.entries.push(("send email".into(), send_email()));
        lib
    }

    /// Parse an ordered `[[workflow]]` table. Every plan is validated.
    pub fn from_toml_str(content: &str) -> JarvisResult<Self> {
        let file: LibraryFile = toml::from_str(content)?;
        let mut lib = Self::new();
        for entry in file.workflow {
            let phrase = entry.phrase.trim().to_lowercase();
            if phrase.is_empty() {
                return Err(JarvisError::Workflow("workflow phrase must not be empty".into()));
            }
            let plan = Plan::new(entry.steps)
                .map_err(|e| JarvisError::Workflow(format!("workflow \"{phrase}\": {e}")))?;
            lib.insert(phrase, plan);
        }
        Ok(lib)
    }

    pub fn load(path: &Path) -> JarvisResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let lib = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), workflows = lib.len(), "workflow library loaded");
        Ok(lib)
    }

    /// Appends an entry; an existing phrase keeps its position and gets the new plan.
    pub fn insert(&mut self, phrase: impl Into<String>, plan: Plan) {
        let phrase = phrase.into().to_lowercase();
        match self.entries.iter_mut().find(|(p, _)| *p == phrase) {
            Some(entry) => entry.1 = plan,
            None => self.entries.push((phrase, plan)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// Returns the plan of the first phrase contained in `instruction`,
    /// or an empty plan.
    pub fn get_workflow(&self, instruction: &str) -> Plan {
        let lowered = instruction.to_lowercase();
        self.entries
            .iter()
            .find(|(phrase, _)| lowered.contains(phrase.as_str()))
            .map(|(phrase, plan)| {
                tracing::debug!(phrase = %phrase, steps = plan.len(), "library hit");
                plan.clone()
            })
            .unwrap_or_default()
    }
}

/// New plan where every step whose `value` is a key of `parameters`
/// gets the mapped value. All other fields are copied. The result is
/// validated, so mapping a typed value to "" is an error.
pub fn customize_workflow(plan: &Plan, parameters: &HashMap<String, String>) -> JarvisResult<Plan> {
    let steps = plan
        .iter()
        .map(|step| {
            let mut step = step.clone();
            if let Some(replacement) = step.value.as_ref().and_then(|v| parameters.get(v)) {
                step.value = Some(replacement.clone());
            }
            step
        })
        .collect();
    Plan::new(steps)
}

// ── Stock workflows ─────────────────────────────────────────────────────────

fn spotify_play_music() -> Plan {
    Plan::from_steps_unchecked(vec![
        WorkflowStep::click("Spotify app icon"),
        WorkflowStep::wait("app to load", 3),
        WorkflowStep::click("search bar"),
        WorkflowStep::type_text("search input", "cello music"),
        WorkflowStep::enter("submit search"),
        WorkflowStep::click("first search result play button"),
    ])
}

fn open_browser_search() -> Plan {
    Plan::from_steps_unchecked(vec![
        WorkflowStep::click("browser icon"),
        WorkflowStep::wait("browser to load", 2),
        WorkflowStep::click("address bar"),
        WorkflowStep::type_text("search query", "python tutorials"),
        WorkflowStep::enter("navigate"),
    ])
}

fn send_email() -> Plan {
    Plan::from_steps_unchecked(vec![
        WorkflowStep::click("email app"),
        WorkflowStep::click("compose button"),
        WorkflowStep::click("to field"),
        WorkflowStep::type_text("recipient", "example@email.com"),
        WorkflowStep::click("subject field"),
        WorkflowStep::type_text("subject", "Meeting reminder"),
        WorkflowStep::click("message body"),
        WorkflowStep::type_text("message", "Don't forget our meeting at 3pm"),
        WorkflowStep::click("send button"),
    ])
}
