use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm::provider::{CompletionRequest, LLMProvider};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completions client for OpenAI and API-compatible endpoints.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ApiError,
}

impl ChatResponse {
    /// Text of the first choice. An empty string is a valid completion; a
    /// missing choice or a `null` content is not.
    fn into_text(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(Error::LLMApi(error.message));
        }

        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::LLMApi("No message content in OpenAI response".to_string()))
    }
}

impl OpenAIProvider {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder().build()?;

        let base_url = base_url
            .unwrap_or_else(|| OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(Error::LLMApi(format!("OpenAI API error ({}): {}", status, detail)));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to parse OpenAI response: {}", e)))?;

        result.into_text()
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider =
            OpenAIProvider::new("key".to_string(), Some("http://localhost:8080/v1/".to_string())).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4",
            messages: vec![ChatMessage {
                role: "system",
                content: "sys",
            }],
            temperature: 0.7,
            max_tokens: 500,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["messages"][0]["role"], "system");
    }

    fn parse(body: &str) -> ChatResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_response_with_null_content_is_error() {
        let parsed = parse(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#);
        assert!(matches!(parsed.into_text(), Err(Error::LLMApi(_))));
    }

    #[test]
    fn test_response_without_choices_is_error() {
        assert!(parse(r#"{"choices":[]}"#).into_text().is_err());
    }

    #[test]
    fn test_empty_content_is_returned_as_is() {
        let parsed = parse(r#"{"choices":[{"message":{"content":""}}]}"#);
        assert_eq!(parsed.into_text().unwrap(), "");
    }

    #[test]
    fn test_api_error_body_wins() {
        let parsed = parse(r#"{"error":{"message":"Rate limit reached"}}"#);
        let err = parsed.into_text().unwrap_err();
        assert_eq!(err.to_string(), "LLM API error: Rate limit reached");
    }
}
