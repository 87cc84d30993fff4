use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, LlmConfig};
use crate::errors::{JarvisError, JarvisResult};
use crate::llm::provider::LlmProvider;
use crate::llm::providers::ollama::OllamaProvider;
use crate::llm::providers::openai_compatible::OpenAiCompatibleProvider;
use crate::llm::types::GenerationOptions;

/// Registry of all configured text-generation providers, keyed by their config.toml identifier.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    active: String,
    llm_config: LlmConfig,
    timeout: Duration,
}

impl ProviderRegistry {
    pub fn register(&mut self, provider: Arc<dyn LlmProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get_active(&self) -> JarvisResult<Arc<dyn LlmProvider>> {
        self.providers.get(&self.active).cloned().ok_or_else(|| {
            let names = self.list_names();
            let registered = if names.is_empty() { "none".to_string() } else { names.join(", ") };
            JarvisError::Config(format!(
                "Active provider '{}' not found in registry (registered: {registered})",
                self.active
            ))
        })
    }

    /// Registered provider ids, sorted.
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Generation options of the active provider: its model, temperature and
    /// output bound, plus the request deadline.
    pub fn active_options(&self) -> GenerationOptions {
        let (model, temperature, max_tokens) = self
            .llm_config
            .providers
            .get(&self.active)
            .map(|p| (p.model.clone(), p.temperature, p.max_tokens))
            .unwrap_or_else(|| (String::new(), 0.1, 200));
        GenerationOptions {
            model,
            temperature,
            max_tokens,
            timeout: self.timeout,
        }
    }

    /// Build a registry from the loaded app config.
    /// API keys are read from environment variables named `JARVIS_<ID>_API_KEY`.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
            active: config.llm.active_provider.clone(),
            llm_config: config.llm.clone(),
            timeout: Duration::from_secs(config.planner.timeout_secs),
        };
        for (id, entry) in &config.llm.providers {
            let provider: Arc<dyn LlmProvider> = match entry.adapter.as_deref() {
                Some("openai") => {
                    let api_key = std::env::var(format!("JARVIS_{}_API_KEY", id.to_uppercase()))
                        .unwrap_or_else(|_| entry.api_key.clone().unwrap_or_default());
                    Arc::new(OpenAiCompatibleProvider::new(id.clone(), entry.api_base.clone(), api_key))
                }
                None | Some("ollama") => {
                    Arc::new(OllamaProvider::new(id.clone(), entry.api_base.clone()))
                }
                Some(other) => {
                    tracing::warn!(provider = %id, adapter = other, "unknown adapter, provider skipped");
                    continue;
                }
            };
            tracing::debug!(provider = %id, display_name = %entry.display_name, "provider registered");
            registry.register(provider);
        }
        registry
    }
}
