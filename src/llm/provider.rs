use async_trait::async_trait;
use crate::error::Result;

/// One chat-style completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the raw response text. Transport, auth and quota failures
    /// come back as errors and are never retried here.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
    fn name(&self) -> &str;
}
