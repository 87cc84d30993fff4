use async_trait::async_trait;

use crate::errors::{JarvisError, JarvisResult};
use crate::llm::provider::LlmProvider;
use crate::llm::types::{ChatMessage, GenerationOptions};

/// Any OpenAI-compatible chat-completions endpoint. `api_base` is the full
/// completions URL.
pub struct OpenAiCompatibleProvider {
    id: String,
    api_base: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(id: String, api_base: String, api_key: String) -> Self {
        Self {
            id,
            api_base,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.id
    }

    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> JarvisResult<String> {
        let body = serde_json::json!({
            "model": options.model,
            "messages": [ChatMessage::user(prompt)],
            "stream": false,
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        tracing::debug!(
            provider = %self.id,
            model = %options.model,
            "sending chat completion request"
        );

        let mut request = self
            .client
            .post(&self.api_base)
            .timeout(options.timeout)
            .json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(JarvisError::LlmProvider(format!("{}: {}", status, err_body)));
        }

        let json: serde_json::Value = response.json().await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();

        tracing::info!(provider = %self.id, content_len = content.len(), "LLM JSON response received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn extracts_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({ "max_tokens": 200, "stream": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "[{\"action_type\":\"enter\"}]" } }]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new(
            "deepseek".into(),
            format!("{}/v1/chat/completions", server.uri()),
            "test-key".into(),
        );
        let text = provider
            .complete("plan", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "[{\"action_type\":\"enter\"}]");
    }

    #[tokio::test]
    async fn unauthorized_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = OpenAiCompatibleProvider::new("x".into(), server.uri(), String::new());
        assert!(provider.complete("plan", &GenerationOptions::default()).await.is_err());
    }
}
