use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
}

impl ProviderKind {
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => DEFAULT_OPENAI_MODEL,
            ProviderKind::Anthropic => DEFAULT_CLAUDE_MODEL,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            other => Err(Error::Config(format!("Unknown LLM provider: {}", other))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Settings resolved from the environment. CLI flags take precedence over
/// every field here.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let provider = match env::var("LLM_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => ProviderKind::OpenAI,
        };

        let api_key = read_api_key(provider);

        let model = env::var("LLM_MODEL").ok().filter(|v| !v.trim().is_empty());

        let base_url = env::var("LLM_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
        })
    }

    /// Switches provider, re-reading the credential from that provider's
    /// variable.
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        if provider != self.provider {
            self.provider = provider;
            self.api_key = read_api_key(provider);
        }
        self
    }

    /// Returns the credential, or a configuration error naming the variable
    /// that should have carried it.
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key.clone().ok_or_else(|| {
            Error::Config(format!(
                "{} environment variable not set (or pass --api-key)",
                self.provider.api_key_var()
            ))
        })
    }
}

fn read_api_key(provider: ProviderKind) -> Option<String> {
    env::var(provider.api_key_var())
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Fixed completion settings for a scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ScoringConfig {
    pub const TEMPERATURE: f32 = 0.7;
    pub const MAX_TOKENS: u32 = 500;

    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: Self::TEMPERATURE,
            max_tokens: Self::MAX_TOKENS,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OPENAI_MODEL)
    }
}
