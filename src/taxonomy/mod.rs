use std::collections::HashSet;

use regex::Regex;

use crate::error::{Error, Result};
use crate::models::{EntityLabel, EntitySpan};

const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "node.js",
    "sql",
    "machine learning",
    "data analysis",
    "nlp",
    "aws",
    "docker",
];

/// Ordered list of known skill phrases. Built once at startup and only
/// read afterwards.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    phrases: Vec<String>,
}

impl SkillVocabulary {
    pub fn new() -> Self {
        Self::from_phrases(DEFAULT_SKILLS.iter().copied())
    }

    /// Keeps the first occurrence of each phrase, comparing keys
    /// case-insensitively. Blank phrases are dropped.
    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self { phrases: Vec::new() };
        vocabulary.extend(phrases);
        vocabulary
    }

    pub fn with_extra<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extend(phrases);
        self
    }

    fn extend<I, S>(&mut self, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.phrases.iter().map(|p| p.to_lowercase()).collect();
        for phrase in phrases {
            let phrase = phrase.as_ref().trim();
            if phrase.is_empty() {
                continue;
            }
            if seen.insert(phrase.to_lowercase()) {
                self.phrases.push(phrase.to_string());
            }
        }
    }

    pub fn contains(&self, phrase: &str) -> bool {
        let lower = phrase.trim().to_lowercase();
        self.phrases.iter().any(|p| p.to_lowercase() == lower)
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact, case-sensitive phrase matcher over a [`SkillVocabulary`].
///
/// Phrases are tried longest first, so "machine learning" wins over a
/// hypothetical "machine" at the same position. A phrase only matches on
/// word boundaries where its own first or last character is a word
/// character, which keeps "java" from matching inside "javascript".
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    pattern: Option<Regex>,
}

impl SkillMatcher {
    pub fn new(vocabulary: &SkillVocabulary) -> Result<Self> {
        if vocabulary.is_empty() {
            return Ok(Self { pattern: None });
        }

        let mut phrases: Vec<&str> = vocabulary.phrases().iter().map(String::as_str).collect();
        phrases.sort_by(|a, b| b.len().cmp(&a.len()));

        let alternatives: Vec<String> = phrases.iter().map(|p| bounded(p)).collect();
        let pattern = Regex::new(&alternatives.join("|"))
            .map_err(|e| Error::Config(format!("Invalid skill vocabulary: {}", e)))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn find_spans(&self, text: &str) -> Vec<EntitySpan> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .find_iter(text)
            .map(|m| EntitySpan::new(m.start(), m.end(), m.as_str(), EntityLabel::Skill))
            .collect()
    }
}

fn bounded(phrase: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let prefix = if phrase.chars().next().is_some_and(is_word) { r"\b" } else { "" };
    let suffix = if phrase.chars().last().is_some_and(is_word) { r"\b" } else { "" };
    format!("{}{}{}", prefix, regex::escape(phrase), suffix)
}
