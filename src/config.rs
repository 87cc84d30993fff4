use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{JarvisError, JarvisResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub perception: PerceptionConfig,
    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub active_provider: String,
    #[serde(default)]
    pub providers: HashMap<String, ProviderEntry>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let mut providers = HashMap::new();
        providers.insert(
            "ollama".to_string(),
            ProviderEntry {
                display_name: "Local Ollama".into(),
                api_base: "http://localhost:11434".into(),
                model: "gemma2:2b".into(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
                adapter: None,
                api_key: None,
            },
        );
        Self {
            active_provider: "ollama".into(),
            providers,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub display_name: String,
    pub api_base: String,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// "openai" for chat-completions endpoints, None/"ollama" for Ollama.
    pub adapter: Option<String>,
    /// Optional API key stored in config.toml (falls back to env var JARVIS_<ID>_API_KEY).
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_temperature() -> f64 {
    0.1
}

fn default_max_tokens() -> u32 {
    200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Fall back to the generative service when the library has no match.
    #[serde(default = "default_true")]
    pub generative: bool,
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
    /// Optional TOML workflow table replacing the built-in library.
    #[serde(default)]
    pub workflows_file: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            generative: true,
            timeout_secs: default_generation_timeout(),
            workflows_file: None,
        }
    }
}

fn default_generation_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default = "default_ollama_base")]
    pub api_base: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Deadline for one embedding request.
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            api_base: default_ollama_base(),
            model: default_embedding_model(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

fn default_ollama_base() -> String {
    "http://localhost:11434".into()
}

fn default_embedding_model() -> String {
    "all-minilm".into()
}

fn default_embedding_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackend {
    Tesseract,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptionConfig {
    #[serde(default = "default_ocr")]
    pub ocr: OcrBackend,
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    /// ONNX layout classifier; without it every region gets `fallback_label`.
    #[serde(default)]
    pub classifier_model: Option<PathBuf>,
    #[serde(default)]
    pub classifier_labels: Vec<String>,
    #[serde(default = "default_fallback_label")]
    pub fallback_label: String,
    #[serde(default = "default_edge_threshold")]
    pub edge_threshold: u8,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            ocr: default_ocr(),
            tesseract_path: default_tesseract_path(),
            classifier_model: None,
            classifier_labels: Vec::new(),
            fallback_label: default_fallback_label(),
            edge_threshold: default_edge_threshold(),
        }
    }
}

fn default_ocr() -> OcrBackend {
    OcrBackend::Tesseract
}

fn default_tesseract_path() -> String {
    "tesseract".into()
}

fn default_fallback_label() -> String {
    "button".into()
}

fn default_edge_threshold() -> u8 {
    24
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_true")]
    pub record_history: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            record_history: true,
        }
    }
}

fn default_settle_delay() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn resolve_config_path() -> JarvisResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(JarvisError::Config(
        "config.toml not found next to executable or in working directory".into(),
    ))
}

/// Loads config.toml from the default search locations.
pub fn load_config() -> JarvisResult<AppConfig> {
    let path = resolve_config_path()?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> JarvisResult<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), provider = %config.llm.active_provider, "config loaded");
    Ok(config)
}
