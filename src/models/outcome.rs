use serde::{Deserialize, Serialize};

use super::entity::EntitySet;

pub const NO_FEEDBACK: &str = "No feedback provided.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub feedback: String,
}

impl Default for ScoreResult {
    fn default() -> Self {
        Self {
            score: 0.0,
            feedback: NO_FEEDBACK.to_string(),
        }
    }
}

/// Everything a successful run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub entities: EntitySet,
    pub score: f64,
    pub feedback: String,
}

/// The single value handed back to callers of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Success {
        entities: EntitySet,
        score: f64,
        feedback: String,
    },
    Failure {
        error: String,
    },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }
}

impl From<ScreeningReport> for PipelineOutcome {
    fn from(report: ScreeningReport) -> Self {
        PipelineOutcome::Success {
            entities: report.entities,
            score: report.score,
            feedback: report.feedback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    TextExtracted,
    Normalized,
    EntitiesExtracted,
    PromptBuilt,
    CompletionReceived,
    Parsed,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Start => write!(f, "start"),
            PipelineStage::TextExtracted => write!(f, "text extracted"),
            PipelineStage::Normalized => write!(f, "normalized"),
            PipelineStage::EntitiesExtracted => write!(f, "entities extracted"),
            PipelineStage::PromptBuilt => write!(f, "prompt built"),
            PipelineStage::CompletionReceived => write!(f, "completion received"),
            PipelineStage::Parsed => write!(f, "parsed"),
            PipelineStage::Done => write!(f, "done"),
            PipelineStage::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_serialization() {
        let outcome = PipelineOutcome::Failure {
            error: "boom".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["error"], "boom");
        assert!(json.get("score").is_none());
    }

    #[test]
    fn test_report_converts_to_success() {
        let report = ScreeningReport {
            entities: EntitySet::new(),
            score: 72.0,
            feedback: "Solid".to_string(),
        };
        let outcome = PipelineOutcome::from(report);
        assert!(outcome.is_success());
    }
}
