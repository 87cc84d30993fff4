// Text-encoding boundary for semantic matching.
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::{JarvisError, JarvisResult};

/// Maps a string to a fixed-dimension embedding vector.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    async fn encode(&self, text: &str) -> JarvisResult<Vec<f32>>;
}

/// Ollama `/api/embeddings` client.
pub struct OllamaEncoder {
    api_base: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaEncoder {
    pub fn new(api_base: String, model: String) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            timeout: Duration::from_secs(30),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TextEncoder for OllamaEncoder {
    async fn encode(&self, text: &str) -> JarvisResult<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": text,
        });

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.api_base))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(JarvisError::Matching(format!("{}: {}", status, err_body)));
        }

        let json: serde_json::Value = response.json().await?;
        let vector: Vec<f32> = json["embedding"]
            .as_array()
            .ok_or_else(|| JarvisError::Matching("response has no embedding".into()))?
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();

        if vector.is_empty() {
            return Err(JarvisError::Matching("empty embedding".into()));
        }
        tracing::trace!(model = %self.model, dim = vector.len(), "text encoded");
        Ok(vector)
    }
}
