use std::path::Path;

use crate::analysis::entity_extractor::EntityExtractor;
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::extraction::{normalize, TextExtractor};
use crate::llm::{parse_score_response, CompletionRequest, LLMProvider, ScoringPrompt, SYSTEM_PROMPT};
use crate::models::{PipelineOutcome, PipelineStage, ScreeningReport};

/// Runs one resume through extraction, entity tagging, prompting, a single
/// completion call and response parsing.
///
/// Stages run strictly in order. The first fatal error (unreadable document,
/// failed completion call) ends the run; nothing is retried.
pub struct ScreeningPipeline {
    extractor: Box<dyn TextExtractor>,
    entities: EntityExtractor,
    llm: Box<dyn LLMProvider>,
    config: ScoringConfig,
}

impl ScreeningPipeline {
    pub fn new(
        extractor: impl TextExtractor + 'static,
        entities: EntityExtractor,
        llm: impl LLMProvider + 'static,
        config: ScoringConfig,
    ) -> Self {
        Self {
            extractor: Box::new(extractor),
            entities,
            llm: Box::new(llm),
            config,
        }
    }

    /// Like [`try_run`](Self::try_run), with any fatal error folded into
    /// [`PipelineOutcome::Failure`].
    pub async fn run(&self, document: &Path, job_description: &str) -> PipelineOutcome {
        match self.try_run(document, job_description).await {
            Ok(report) => report.into(),
            Err(e) => {
                tracing::error!(stage = %PipelineStage::Failed, "Screening {} failed: {}", document.display(), e);
                PipelineOutcome::Failure {
                    error: e.to_string(),
                }
            }
        }
    }

    pub async fn try_run(&self, document: &Path, job_description: &str) -> Result<ScreeningReport> {
        enter(PipelineStage::Start);

        // Step 1: Extract text from the document
        tracing::info!("Extracting text from {}", document.display());
        let raw_text = self
            .extractor
            .extract_text(document)
            .inspect_err(|e| tracing::warn!("Document could not be read: {}", e))?;
        enter(PipelineStage::TextExtracted);
        tracing::debug!("Extracted {} characters", raw_text.chars().count());

        // Step 2: Normalize
        let cleaned = normalize(&raw_text);
        enter(PipelineStage::Normalized);
        if cleaned.is_empty() {
            tracing::warn!("No text recovered from {}, scoring an empty resume", document.display());
        }

        // Step 3: Tag entities
        let entities = self.entities.extract_document(&raw_text, &cleaned);
        enter(PipelineStage::EntitiesExtracted);
        tracing::info!(
            "Found {} skills, {} organizations, {} dates, {} emails",
            entities.skills().len(),
            entities.organizations().len(),
            entities.dates().len(),
            entities.emails().len()
        );

        // Step 4: Build prompt
        let prompt = ScoringPrompt::build(&entities, job_description);
        enter(PipelineStage::PromptBuilt);
        tracing::debug!("Prompt is ~{} tokens", prompt.estimate_tokens());

        // Step 5: Ask the model
        let request = CompletionRequest {
            model: self.config.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            user: prompt.into_string(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        tracing::info!("Requesting score from {} ({})", self.llm.name(), self.config.model);
        let response = self.llm.complete(request).await?;
        enter(PipelineStage::CompletionReceived);

        // Step 6: Parse score and feedback
        let result = parse_score_response(&response);
        enter(PipelineStage::Parsed);

        enter(PipelineStage::Done);
        tracing::info!("Resume scored {}/100", result.score);

        Ok(ScreeningReport {
            entities,
            score: result.score,
            feedback: result.feedback,
        })
    }
}

fn enter(stage: PipelineStage) {
    tracing::debug!(%stage, "Pipeline stage");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct StubExtractor(std::result::Result<String, String>);

    impl TextExtractor for StubExtractor {
        fn extract_text(&self, _path: &Path) -> Result<String> {
            self.0.clone().map_err(Error::Extraction)
        }
    }

    #[derive(Clone)]
    struct StubProvider {
        response: std::result::Result<String, String>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl StubProvider {
        fn replying(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for StubProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            self.response.clone().map_err(Error::LLMApi)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    const RESUME: &str = "Jane Roe\njane.roe@example.com\n\
                          Initech Inc, Analyst (Mar 2018 - 2022)\n\
                          python, sql, data analysis";

    fn pipeline(extracted: std::result::Result<String, String>, llm: StubProvider) -> ScreeningPipeline {
        ScreeningPipeline::new(
            StubExtractor(extracted),
            EntityExtractor::with_defaults().unwrap(),
            llm,
            ScoringConfig::new("test-model"),
        )
    }

    #[tokio::test]
    async fn test_successful_run() {
        let llm = StubProvider::replying("Score: 78\nFeedback: Good SQL depth.");
        let requests = llm.requests.clone();
        let outcome = pipeline(Ok(RESUME.to_string()), llm)
            .run(Path::new("resume.pdf"), "SQL analyst")
            .await;

        match outcome {
            PipelineOutcome::Success {
                entities,
                score,
                feedback,
            } => {
                assert_eq!(score, 78.0);
                assert_eq!(feedback, "Good SQL depth.");
                assert!(entities.skills().contains("data analysis"));
                assert!(entities.emails().contains("jane.roe@example.com"));
                assert!(entities.organizations().contains("Initech Inc"));
            }
            PipelineOutcome::Failure { error } => panic!("unexpected failure: {}", error),
        }

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "test-model");
        assert_eq!(request.system, "You are an expert HR professional analyzing resumes.");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 500);
        assert!(request.user.contains("Skills: data analysis, python, sql"));
        assert!(request.user.contains("SQL analyst"));
    }

    #[tokio::test]
    async fn test_extraction_failure_short_circuits() {
        let llm = StubProvider::replying("Score: 90");
        let requests = llm.requests.clone();
        let outcome = pipeline(Err("corrupt xref table".to_string()), llm)
            .run(Path::new("broken.pdf"), "job")
            .await;

        match outcome {
            PipelineOutcome::Failure { error } => {
                assert!(!error.is_empty());
                assert!(error.contains("corrupt xref table"));
            }
            PipelineOutcome::Success { .. } => panic!("expected failure"),
        }
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completion_failure_is_reported_once() {
        let llm = StubProvider::failing("401 invalid api key");
        let requests = llm.requests.clone();
        let outcome = pipeline(Ok(RESUME.to_string()), llm)
            .run(Path::new("resume.pdf"), "job")
            .await;

        assert_eq!(
            outcome,
            PipelineOutcome::Failure {
                error: "LLM API error: 401 invalid api key".to_string()
            }
        );
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unstructured_completion_degrades_to_defaults() {
        let llm = StubProvider::replying("I cannot evaluate this.");
        let outcome = pipeline(Ok(RESUME.to_string()), llm)
            .run(Path::new("resume.pdf"), "job")
            .await;

        match outcome {
            PipelineOutcome::Success { score, feedback, .. } => {
                assert_eq!(score, 0.0);
                assert_eq!(feedback, "No feedback provided.");
            }
            PipelineOutcome::Failure { error } => panic!("unexpected failure: {}", error),
        }
    }

    #[tokio::test]
    async fn test_empty_completion_degrades_to_defaults() {
        let llm = StubProvider::replying("");
        let outcome = pipeline(Ok(RESUME.to_string()), llm)
            .run(Path::new("resume.pdf"), "job")
            .await;

        match outcome {
            PipelineOutcome::Success { entities, score, feedback } => {
                assert!(entities.skills().contains("python"));
                assert_eq!(score, 0.0);
                assert_eq!(feedback, "No feedback provided.");
            }
            PipelineOutcome::Failure { error } => panic!("unexpected failure: {}", error),
        }
    }

    #[tokio::test]
    async fn test_runs_are_deterministic() {
        let llm = StubProvider::replying("Score: 64\nFeedback: Needs NLP.");
        let pipeline = pipeline(Ok(RESUME.to_string()), llm);

        let first = pipeline.run(Path::new("resume.pdf"), "NLP role").await;
        let second = pipeline.run(Path::new("resume.pdf"), "NLP role").await;

        assert!(first.is_success());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_empty_document_still_scores() {
        let llm = StubProvider::replying("Score: 5\nFeedback: Empty resume.");
        let outcome = pipeline(Ok(String::new()), llm)
            .run(Path::new("blank.txt"), "job")
            .await;

        match outcome {
            PipelineOutcome::Success { entities, score, .. } => {
                assert!(entities.is_empty());
                assert_eq!(score, 5.0);
            }
            PipelineOutcome::Failure { error } => panic!("unexpected failure: {}", error),
        }
    }
}
