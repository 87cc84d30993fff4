pub mod generator;
pub mod library;
pub mod types;

use crate::workflow::generator::GenerativePlanner;
use crate::workflow::library::WorkflowLibrary;
use crate::workflow::types::Plan;

/// Where a plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    Library,
    Generative,
    None,
}

/// Library lookup first, generative fallback second.
pub struct PlanGenerator {
    library: WorkflowLibrary,
    generative: Option<GenerativePlanner>,
}

impl PlanGenerator {
    pub fn new(library: WorkflowLibrary, generative: Option<GenerativePlanner>) -> Self {
        Self { library, generative }
    }

    pub fn library(&self) -> &WorkflowLibrary {
        &self.library
    }

    pub async fn generate(&self, instruction: &str) -> (Plan, PlanSource) {
        let plan = self.library.get_workflow(instruction);
        if !plan.is_empty() {
            tracing::info!(steps = plan.len(), "plan from workflow library");
            return (plan, PlanSource::Library);
        }

        let Some(generative) = &self.generative else {
            tracing::info!("no library match and generative fallback disabled");
            return (Plan::empty(), PlanSource::None);
        };

        tracing::info!("no library match, asking generative planner");
        let plan = generative.generate(instruction).await;
        let source = if plan.is_empty() {
            PlanSource::None
        } else {
            PlanSource::Generative
        };
        (plan, source)
    }
}
