use async_trait::async_trait;

use crate::errors::JarvisResult;
use crate::llm::types::GenerationOptions;

/// Request/response text generation service.
/// New backends implement this trait and get an `adapter` name in config.toml.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider's identifier (matches the config.toml key).
    fn name(&self) -> &str;

    /// Sends a single prompt and returns the raw completion text.
    /// Transport failures and non-2xx statuses are errors.
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> JarvisResult<String>;
}
