use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::JarvisResult;
use crate::matching::encoder::TextEncoder;
use crate::perception::types::UIElement;

/// Scores how well a natural-language description names a UI element.
/// Result lies in [-1, 1]; identical inputs give identical scores.
#[async_trait]
pub trait SemanticMatcher: Send + Sync {
    async fn score(&self, description: &str, element: &UIElement) -> f32;
}

/// Cosine similarity between the embedding of the description and the
/// embedding of the element's `"{type} {text}"`.
///
/// Encodings are cached per distinct string for the matcher's lifetime. The
/// encoder is deterministic for a given string, so the cache never changes a
/// score.
pub struct EmbeddingMatcher {
    encoder: Arc<dyn TextEncoder>,
    cache: Mutex<HashMap<String, Arc<Vec<f32>>>>,
}

impl EmbeddingMatcher {
    pub fn new(encoder: Arc<dyn TextEncoder>) -> Self {
        Self {
            encoder,
            cache: Mutex::new(HashMap::new()),
        }
    }

    async fn embed(&self, text: &str) -> JarvisResult<Arc<Vec<f32>>> {
        if let Some(hit) = self.cache.lock().await.get(text) {
            return Ok(hit.clone());
        }
        let vector = Arc::new(self.encoder.encode(text).await?);
        self.cache
            .lock()
            .await
            .insert(text.to_string(), vector.clone());
        Ok(vector)
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[async_trait]
impl SemanticMatcher for EmbeddingMatcher {
    async fn score(&self, description: &str, element: &UIElement) -> f32 {
        let element_text = element.match_text();
        let pair = async {
            let a = self.embed(description).await?;
            let b = self.embed(&element_text).await?;
            JarvisResult::Ok(cosine(&a, &b))
        };
        match pair.await {
            Ok(s) => s,
            Err(e) => {
                // lowest possible score: can never clear the threshold
                tracing::warn!(error = %e, description, "encoding failed");
                -1.0
            }
        }
    }
}

/// Cosine similarity clamped to [-1, 1]. Mismatched lengths compare the
/// common prefix; a zero vector scores 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0f64, 0f64, 0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0) as f32
}
