pub mod provider;
pub mod openai;
pub mod claude;
pub mod prompts;
pub mod parser;

pub use provider::{CompletionRequest, LLMProvider};
pub use openai::OpenAIProvider;
pub use claude::ClaudeProvider;
pub use prompts::{ScoringPrompt, SYSTEM_PROMPT};
pub use parser::parse_score_response;
