use async_trait::async_trait;

use crate::errors::{JarvisError, JarvisResult};
use crate::llm::provider::LlmProvider;
use crate::llm::types::GenerationOptions;

/// Local Ollama server, `/api/generate` with streaming disabled.
pub struct OllamaProvider {
    id: String,
    api_base: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(id: String, api_base: String) -> Self {
        Self {
            id,
            api_base: api_base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        &self.id
    }

    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> JarvisResult<String> {
        let body = serde_json::json!({
            "model": options.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": options.temperature,
                "num_predict": options.max_tokens,
            },
        });

        tracing::debug!(
            provider = %self.id,
            model = %options.model,
            prompt_len = prompt.len(),
            "sending generate request"
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.api_base))
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(JarvisError::LlmProvider(format!("{}: {}", status, err_body)));
        }

        let json: serde_json::Value = response.json().await?;
        let text = json["response"].as_str().unwrap_or("").to_string();
        tracing::info!(provider = %self.id, response_len = text.len(), "generate response received");
        Ok(text)
    }
}
