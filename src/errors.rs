use thiserror::Error;

#[derive(Debug, Error)]
pub enum JarvisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("Perception error: {0}")]
    Perception(String),

    #[error("Matching error: {0}")]
    Matching(String),

    #[error("Executor error: {0}")]
    Executor(String),

    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type JarvisResult<T> = Result<T, JarvisError>;

/// Why a plan stopped. Every variant aborts the remaining steps; nothing
/// already performed is undone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// No plan could be produced for the instruction.
    #[error("plan generation failed: {reason}")]
    Generation { reason: String },

    /// No candidate cleared the acceptance threshold.
    #[error("step {step}: target not found: \"{target}\"")]
    Resolution { step: usize, target: String },

    /// The input-injection call reported failure.
    #[error("step {step}: {action} failed: {reason}")]
    Actuation {
        step: usize,
        action: String,
        reason: String,
    },
}

impl ExecutionError {
    /// Short machine-friendly kind, used in history records.
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutionError::Generation { .. } => "generation_failure",
            ExecutionError::Resolution { .. } => "resolution_failure",
            ExecutionError::Actuation { .. } => "actuation_failure",
        }
    }
}
