use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ScoreResult, NO_FEEDBACK};

static SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Score:\s*(\d+)").expect("score pattern is valid"));

static FEEDBACK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Feedback:(.*)").expect("feedback pattern is valid"));

static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("digit pattern is valid"));

const MAX_SCORE: f64 = 100.0;

/// Pulls `Score:` and `Feedback:` out of a free-text completion.
///
/// Never fails: a missing or unreadable score becomes `0.0` and missing
/// feedback becomes [`NO_FEEDBACK`]. Scores above 100 are clamped.
pub fn parse_score_response(response: &str) -> ScoreResult {
    let score = extract_score(response).unwrap_or_else(|| {
        tracing::warn!("No score found in completion response, defaulting to 0");
        0.0
    });

    let feedback = extract_feedback(response).unwrap_or_else(|| {
        tracing::warn!("No feedback found in completion response");
        NO_FEEDBACK.to_string()
    });

    ScoreResult { score, feedback }
}

fn extract_score(text: &str) -> Option<f64> {
    let digits = SCORE_PATTERN.captures(text)?.get(1)?.as_str();
    let value = digits
        .chars()
        .try_fold(0.0_f64, |acc, c| decimal_value(c).map(|d| acc * 10.0 + f64::from(d)))?;
    Some(value.clamp(0.0, MAX_SCORE))
}

/// Value of any Unicode decimal digit, not just ASCII ones. Decimal digits
/// are encoded in contiguous runs of ten starting at zero, so the value is
/// the offset from the start of the run modulo ten.
fn decimal_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = u32::from(c);
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((u32::from(c) - start) % 10)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

fn extract_feedback(text: &str) -> Option<String> {
    let body = FEEDBACK_PATTERN.captures(text)?.get(1)?.as_str();
    Some(body.trim().to_string())
}
