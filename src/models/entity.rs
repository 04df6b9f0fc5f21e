use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Skills,
    Organizations,
    Dates,
    Emails,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 4] = [
        EntityCategory::Skills,
        EntityCategory::Organizations,
        EntityCategory::Dates,
        EntityCategory::Emails,
    ];
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityCategory::Skills => write!(f, "Skills"),
            EntityCategory::Organizations => write!(f, "Organizations"),
            EntityCategory::Dates => write!(f, "Dates"),
            EntityCategory::Emails => write!(f, "Emails"),
        }
    }
}

/// Label attached to a tagged span of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Skill,
    Org,
    Date,
    Other(String),
}

impl EntityLabel {
    /// Bucket a span with this label is filed under, if any.
    pub fn category(&self) -> Option<EntityCategory> {
        match self {
            EntityLabel::Skill => Some(EntityCategory::Skills),
            EntityLabel::Org => Some(EntityCategory::Organizations),
            EntityLabel::Date => Some(EntityCategory::Dates),
            EntityLabel::Other(_) => None,
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityLabel::Skill => write!(f, "SKILL"),
            EntityLabel::Org => write!(f, "ORG"),
            EntityLabel::Date => write!(f, "DATE"),
            EntityLabel::Other(label) => write!(f, "{}", label),
        }
    }
}

/// A labelled byte range of the text that was tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub label: EntityLabel,
}

impl EntitySpan {
    pub fn new(start: usize, end: usize, text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            label,
        }
    }

    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Categorized entities found in a resume. Each bucket holds distinct,
/// trimmed, non-empty strings in ascending ordinal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    skills: BTreeSet<String>,
    organizations: BTreeSet<String>,
    dates: BTreeSet<String>,
    emails: BTreeSet<String>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to a bucket. Returns false when the value was blank or
    /// already present.
    pub fn insert(&mut self, category: EntityCategory, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.bucket_mut(category).insert(value.to_string())
    }

    pub fn get(&self, category: EntityCategory) -> &BTreeSet<String> {
        match category {
            EntityCategory::Skills => &self.skills,
            EntityCategory::Organizations => &self.organizations,
            EntityCategory::Dates => &self.dates,
            EntityCategory::Emails => &self.emails,
        }
    }

    fn bucket_mut(&mut self, category: EntityCategory) -> &mut BTreeSet<String> {
        match category {
            EntityCategory::Skills => &mut self.skills,
            EntityCategory::Organizations => &mut self.organizations,
            EntityCategory::Dates => &mut self.dates,
            EntityCategory::Emails => &mut self.emails,
        }
    }

    pub fn skills(&self) -> &BTreeSet<String> {
        &self.skills
    }

    pub fn organizations(&self) -> &BTreeSet<String> {
        &self.organizations
    }

    pub fn dates(&self) -> &BTreeSet<String> {
        &self.dates
    }

    pub fn emails(&self) -> &BTreeSet<String> {
        &self.emails
    }

    pub fn joined(&self, category: EntityCategory) -> String {
        self.get(category)
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        EntityCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
