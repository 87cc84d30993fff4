pub mod agent_engine;
pub mod config;
pub mod errors;
pub mod executor;
pub mod llm;
pub mod matching;
pub mod perception;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use crate::agent_engine::engine::{EngineConfig, ExecutionEngine};
use crate::agent_engine::history::RunHistory;
use crate::config::{AppConfig, OcrBackend};
use crate::errors::JarvisResult;
use crate::executor::input::EnigoActuator;
use crate::llm::registry::ProviderRegistry;
use crate::matching::encoder::OllamaEncoder;
use crate::matching::matcher::EmbeddingMatcher;
use crate::perception::classifier::{default_layout_labels, FixedClassifier, OnnxLayoutClassifier};
use crate::perception::clickable::ClickableRegionDetector;
use crate::perception::ocr::{NoTextDetector, TesseractDetector};
use crate::perception::pipeline::LayoutAnalyzer;
use crate::perception::screenshot::XcapCapture;
use crate::perception::traits::{ElementClassifier, TextRegionDetector};
use crate::workflow::generator::GenerativePlanner;
use crate::workflow::library::WorkflowLibrary;
use crate::workflow::PlanGenerator;

/// `RUST_LOG` wins; otherwise `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

/// Wire the production collaborators described by `config` into an engine.
pub fn build_engine(config: &AppConfig) -> JarvisResult<ExecutionEngine> {
    let planner = build_planner(config)?;

    let text_detector: Arc<dyn TextRegionDetector> = match config.perception.ocr {
        OcrBackend::Tesseract => Arc::new(TesseractDetector::new(config.perception.tesseract_path.clone())),
        OcrBackend::None => Arc::new(NoTextDetector),
    };
    let perception = LayoutAnalyzer::new(
        text_detector,
        ClickableRegionDetector::new(config.perception.edge_threshold),
        build_classifier(config),
    );

    let encoder = OllamaEncoder::new(config.matcher.api_base.clone(), config.matcher.model.clone())
        .with_timeout(Duration::from_secs(config.matcher.timeout_secs.max(1)));
    let matcher = EmbeddingMatcher::new(Arc::new(encoder));

    let mut engine = ExecutionEngine::new(
        planner,
        Arc::new(XcapCapture::new()),
        Arc::new(perception),
        Arc::new(matcher),
        Arc::new(EnigoActuator::new()),
    )
    .with_config(EngineConfig {
        settle_delay: Duration::from_millis(config.engine.settle_delay_ms),
    });

    if config.engine.record_history {
        let history = RunHistory::new();
        tracing::info!(path = %history.path().display(), "recording run history");
        engine = engine.with_history(history);
    }
    Ok(engine)
}

fn build_planner(config: &AppConfig) -> JarvisResult<PlanGenerator> {
    let library = match &config.planner.workflows_file {
        Some(path) => WorkflowLibrary::load(path)?,
        None => WorkflowLibrary::builtin(),
    };
    tracing::info!(workflows = library.len(), "workflow library ready");

    let generative = if config.planner.generative {
        let registry = ProviderRegistry::from_config(config);
        match registry.get_active() {
            Ok(provider) => {
                tracing::info!(provider = %provider.name(), "generative planner enabled");
                Some(GenerativePlanner::new(provider, registry.active_options()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "generative planner disabled");
                None
            }
        }
    } else {
        None
    };

    Ok(PlanGenerator::new(library, generative))
}

fn build_classifier(config: &AppConfig) -> Arc<dyn ElementClassifier> {
    let fallback = || Arc::new(FixedClassifier::new(config.perception.fallback_label.clone()));
    let Some(model) = &config.perception.classifier_model else {
        return fallback();
    };
    let labels = if config.perception.classifier_labels.is_empty() {
        default_layout_labels()
    } else {
        config.perception.classifier_labels.clone()
    };
    match OnnxLayoutClassifier::try_new(model, labels) {
        Some(classifier) => Arc::new(classifier),
        None => fallback(),
    }
}
