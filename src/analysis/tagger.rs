use std::cmp::Reverse;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{EntityLabel, EntitySpan};

/// Labels spans of text with semantic categories.
pub trait EntityTagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<EntitySpan>;
    fn name(&self) -> &str;
}

const ORG_SUFFIXES: &str = "Inc|LLC|Ltd|Corp|Corporation|Company|University|College|Institute|\
Technologies|Technology|Labs|Laboratories|Group|Systems|Solutions|Bank|Foundation|Partners";

static ORG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:[A-Z][\w&]*\s+){{1,4}}(?:{suffixes})\b|\b(?:University|Institute|College) of(?:\s+[A-Z][\w&]*){{1,3}}",
        suffixes = ORG_SUFFIXES
    ))
    .expect("organization pattern is valid")
});

/// Role nouns that end a job title. Capitalized words up to and including
/// the last of these belong to the title, not the organisation.
const ROLE_WORDS: &[&str] = &[
    "Engineer", "Developer", "Manager", "Analyst", "Scientist", "Intern", "Director",
    "Consultant", "Architect", "Designer", "Administrator", "Specialist", "Officer",
    "Associate", "Programmer", "Researcher", "Lead", "Head",
];

const SENIORITY_WORDS: &[&str] = &["Senior", "Junior", "Principal", "Staff", "Chief", "Sr", "Jr"];

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?
           |Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+(?:19|20)\d{2}\b
        | \b(?:0?[1-9]|1[0-2])/(?:19|20)\d{2}\b
        | \b(?:19[5-9]\d|20\d{2})\b
        ",
    )
    .expect("date pattern is valid")
});

/// Pattern-based tagger recognising organisations and dates the way they
/// usually appear on a resume.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        Self
    }
}

impl EntityTagger for RuleTagger {
    fn tag(&self, text: &str) -> Vec<EntitySpan> {
        let orgs = ORG_PATTERN
            .find_iter(text)
            .filter_map(|m| strip_job_title(m.start(), m.as_str()))
            .map(|(start, org)| EntitySpan::new(start, start + org.len(), org, EntityLabel::Org));
        let dates = DATE_PATTERN
            .find_iter(text)
            .map(|m| EntitySpan::new(m.start(), m.end(), m.as_str(), EntityLabel::Date));

        resolve_overlaps(orgs.chain(dates).collect())
    }

    fn name(&self) -> &str {
        "rules"
    }
}

/// Drops a leading job title ("Senior Data Engineer Acme Labs") from an
/// organisation match. Returns the adjusted start offset and text, or `None`
/// when only a bare suffix would remain.
fn strip_job_title(start: usize, matched: &str) -> Option<(usize, &str)> {
    let words: Vec<(usize, &str)> = matched
        .split_whitespace()
        .map(|w| (w.as_ptr() as usize - matched.as_ptr() as usize, w))
        .collect();

    let mut first = words
        .iter()
        .rposition(|(_, w)| ROLE_WORDS.contains(w))
        .map_or(0, |i| i + 1);
    while first < words.len() && SENIORITY_WORDS.contains(&words[first].1) {
        first += 1;
    }

    if first == 0 {
        return Some((start, matched));
    }
    if words.len() - first < 2 {
        return None;
    }

    let offset = words[first].0;
    Some((start + offset, &matched[offset..]))
}

/// Keeps a non-overlapping subset of spans, preferring the earliest start
/// and then the longest span.
pub fn resolve_overlaps(mut spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
    spans.sort_by_key(|s| (s.start, Reverse(s.end)));

    let mut kept: Vec<EntitySpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept.last().map_or(true, |last| span.start >= last.end) {
            kept.push(span);
        }
    }
    kept
}
