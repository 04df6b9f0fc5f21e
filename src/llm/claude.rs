use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm::provider::{CompletionRequest, LLMProvider};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

pub struct ClaudeProvider {
    client: Client,
    api_key: String,
    url: String,
}

#[derive(Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ClaudeMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    error: Option<ClaudeError>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ClaudeError {
    message: String,
}

impl ClaudeResponse {
    /// Joined text blocks. Fails only when the response has no text block
    /// at all; blocks holding empty text still make a valid completion.
    fn into_text(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(Error::LLMApi(error.message));
        }

        let blocks: Vec<String> = self
            .content
            .into_iter()
            .filter(|c| c.content_type == "text")
            .filter_map(|c| c.text)
            .collect();

        if blocks.is_empty() {
            return Err(Error::LLMApi("No text content in Claude response".to_string()));
        }

        Ok(blocks.join(""))
    }
}

impl ClaudeProvider {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder().build()?;

        let url = base_url
            .map(|b| format!("{}/messages", b.trim_end_matches('/')))
            .unwrap_or_else(|| MESSAGES_URL.to_string());

        Ok(Self {
            client,
            api_key,
            url,
        })
    }
}

#[async_trait]
impl LLMProvider for ClaudeProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let request_body = ClaudeRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: Some(request.system),
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: request.user,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::LLMApi(format!(
                "Claude API error ({}): {}",
                status, body
            )));
        }

        let result: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to parse Claude response: {}", e)))?;

        result.into_text()
    }

    fn name(&self) -> &str {
        "Claude"
    }
}
