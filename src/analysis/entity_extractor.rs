use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::tagger::{EntityTagger, RuleTagger};
use crate::error::Result;
use crate::models::{EntityCategory, EntityLabel, EntitySet, EntitySpan};
use crate::taxonomy::{SkillMatcher, SkillVocabulary};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern is valid")
});

/// Combines the skill vocabulary matcher, a generic entity tagger and an
/// email pattern into one [`EntitySet`].
///
/// Skill spans take precedence: a tagger span that overlaps any skill span
/// is dropped, so a skill never shows up as an organisation or a date too.
pub struct EntityExtractor {
    skills: SkillMatcher,
    tagger: Box<dyn EntityTagger>,
}

impl EntityExtractor {
    pub fn new(vocabulary: &SkillVocabulary, tagger: impl EntityTagger + 'static) -> Result<Self> {
        Ok(Self {
            skills: SkillMatcher::new(vocabulary)?,
            tagger: Box::new(tagger),
        })
    }

    /// Default vocabulary with the built-in [`RuleTagger`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(&SkillVocabulary::new(), RuleTagger::new())
    }

    pub fn tagger_name(&self) -> &str {
        self.tagger.name()
    }

    /// Runs every matcher over the same text.
    pub fn extract(&self, text: &str) -> EntitySet {
        self.extract_document(text, text)
    }

    /// Scans `raw` for email addresses and `normalized` for skills,
    /// organisations and dates.
    pub fn extract_document(&self, raw: &str, normalized: &str) -> EntitySet {
        let mut entities = EntitySet::new();

        for span in self.tag_spans(normalized) {
            if let Some(category) = span.label.category() {
                entities.insert(category, &span.text);
            }
        }

        for email in find_emails(raw) {
            entities.insert(EntityCategory::Emails, email);
        }

        tracing::debug!(
            skills = entities.skills().len(),
            organizations = entities.organizations().len(),
            dates = entities.dates().len(),
            emails = entities.emails().len(),
            "Extracted entities"
        );

        entities
    }

    /// Skill spans merged with the tagger's ORG and DATE spans, ordered by
    /// position.
    pub fn tag_spans(&self, text: &str) -> Vec<EntitySpan> {
        let skill_spans = self.skills.find_spans(text);

        let tagged = self
            .tagger
            .tag(text)
            .into_iter()
            .filter(|span| matches!(span.label, EntityLabel::Org | EntityLabel::Date))
            .filter(|span| !skill_spans.iter().any(|skill| skill.overlaps(span)));

        let mut spans: Vec<EntitySpan> = skill_spans.iter().cloned().chain(tagged).collect();
        spans.sort_by_key(|s| (s.start, s.end));
        spans
    }
}

pub fn find_emails(text: &str) -> impl Iterator<Item = &str> {
    EMAIL_PATTERN.find_iter(text).map(|m| m.as_str())
}
