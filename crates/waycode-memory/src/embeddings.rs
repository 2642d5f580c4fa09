//! Embedding providers for the vector store.

use async_trait::async_trait;

use crate::{MemoryError, Result};

/// Trait for embedding text into vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model name.
    fn model(&self) -> &str;
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Gemini embedding provider (`embedContent` endpoint).
pub struct GeminiEmbedding {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiEmbedding {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedding {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:embedContent",
            self.model
        );
        let body = serde_json::json!({
            "model": format!("models/{}", self.model),
            "content": { "parts": [{ "text": text }] },
        });

        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let json: serde_json::Value = resp.json().await?;

        if !status.is_success() {
            let msg = json
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            return Err(MemoryError::Embedding(format!(
                "Gemini embedding error ({status}): {msg}"
            )));
        }

        let values = json
            .get("embedding")
            .and_then(|e| e.get("values"))
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                MemoryError::Embedding("Invalid embedding response format".to_string())
            })?;

        Ok(values
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect())
    }
}

/// Select an embedding provider based on available API keys.
pub fn auto_select_provider(model: &str) -> Option<Box<dyn EmbeddingProvider>> {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        return Some(Box::new(GeminiEmbedding::new(key, model.to_string())));
    }
    // Add more providers here as they are implemented
    None
}
