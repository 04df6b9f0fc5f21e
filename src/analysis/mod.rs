pub mod entity_extractor;
pub mod pipeline;
pub mod tagger;

pub use entity_extractor::EntityExtractor;
pub use pipeline::ScreeningPipeline;
pub use tagger::{EntityTagger, RuleTagger};
