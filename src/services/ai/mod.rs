pub mod facts;
pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A one-shot structured generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Schema the response text must conform to (Gemini `responseSchema` dialect).
    pub response_schema: serde_json::Value,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the raw response text.
    async fn generate(&self, api_key: &str, request: &GenerationRequest) -> anyhow::Result<String>;
}
