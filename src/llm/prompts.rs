use crate::models::{EntityCategory, EntitySet};

pub const SYSTEM_PROMPT: &str = "You are an expert HR professional analyzing resumes.";

/// Rendered instruction prompt comparing a resume's entities with a job
/// description. The `Score:` / `Feedback:` directive at the end is what
/// [`parse_score_response`](crate::llm::parser::parse_score_response) looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringPrompt(String);

impl ScoringPrompt {
    pub fn build(entities: &EntitySet, job_description: &str) -> Self {
        let mut prompt = String::from(
            "Analyze the following resume details against the job description and provide:\n\
             1. A score out of 100\n\
             2. Detailed feedback including strengths and areas for improvement\n\n",
        );

        prompt.push_str("Resume Details:\n");
        prompt.push_str(&format!("Skills: {}\n", entities.joined(EntityCategory::Skills)));
        prompt.push_str(&format!(
            "Organizations: {}\n",
            entities.joined(EntityCategory::Organizations)
        ));
        prompt.push_str(&format!(
            "Experience Timeline: {}\n\n",
            entities.joined(EntityCategory::Dates)
        ));

        prompt.push_str("Job Description:\n");
        prompt.push_str(job_description);
        prompt.push_str("\n\n");

        prompt.push_str(
            "Provide the response in the following format:\n\
             Score: <number>\n\
             Feedback: <detailed feedback>\n",
        );

        Self(prompt)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn estimate_tokens(&self) -> usize {
        // Rough estimate: ~4 characters per token
        self.0.len() / 4
    }
}

impl std::fmt::Display for ScoringPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
