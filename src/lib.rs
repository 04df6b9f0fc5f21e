pub mod config;
pub mod error;
pub mod models;
pub mod extraction;
pub mod taxonomy;
pub mod analysis;
pub mod llm;

pub use config::{Config, ProviderKind, ScoringConfig};
pub use error::{Error, Result};
pub use extraction::{normalize, DocumentExtractor, TextExtractor};
pub use taxonomy::{SkillMatcher, SkillVocabulary};
pub use analysis::{EntityExtractor, EntityTagger, RuleTagger, ScreeningPipeline};
pub use llm::{ClaudeProvider, LLMProvider, OpenAIProvider};
pub use models::{EntityCategory, EntitySet, PipelineOutcome, ScoreResult, ScreeningReport};
