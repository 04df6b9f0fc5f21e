use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use resumescore::models::EntityCategory;
use resumescore::{
    ClaudeProvider, Config, DocumentExtractor, EntityExtractor, LLMProvider, OpenAIProvider,
    PipelineOutcome, ProviderKind, RuleTagger, ScoringConfig, ScreeningPipeline, SkillVocabulary,
};

#[derive(Parser, Debug)]
#[command(name = "resumescore")]
#[command(version = "0.1.0")]
#[command(about = "Extract resume entities and score the resume against a job description")]
struct Args {
    /// Resume to analyze (.pdf, .txt or .md)
    resume: PathBuf,

    /// Job description text
    #[arg(short, long, conflicts_with = "job_file", required_unless_present = "job_file")]
    job: Option<String>,

    /// File containing the job description
    #[arg(long)]
    job_file: Option<PathBuf>,

    /// LLM provider (openai, anthropic)
    #[arg(long)]
    provider: Option<String>,

    /// Model identifier passed to the provider
    #[arg(short, long)]
    model: Option<String>,

    /// API key (defaults to OPENAI_API_KEY or ANTHROPIC_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL for an API-compatible endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Additional skill phrase to recognise (repeatable)
    #[arg(long = "skill")]
    skills: Vec<String>,

    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging on stderr so stdout only carries the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("resumescore=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(ref provider) = args.provider {
        config = config.with_provider(provider.parse()?);
    }
    let api_key = match args.api_key.clone() {
        Some(key) => key,
        None => config.require_api_key()?,
    };
    let base_url = args.base_url.clone().or_else(|| config.base_url.clone());

    let job_description = match (&args.job, &args.job_file) {
        (Some(job), _) => job.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => anyhow::bail!("either --job or --job-file is required"),
    };

    let vocabulary = SkillVocabulary::new().with_extra(&args.skills);
    let entities = EntityExtractor::new(&vocabulary, RuleTagger::new())?;
    tracing::debug!(
        "Skill vocabulary has {} phrases, tagger: {}",
        vocabulary.len(),
        entities.tagger_name()
    );

    let model = args
        .model
        .clone()
        .or_else(|| config.model.clone())
        .unwrap_or_else(|| config.provider.default_model().to_string());
    let scoring = ScoringConfig::new(model);

    let outcome = match config.provider {
        ProviderKind::OpenAI => {
            let llm = OpenAIProvider::new(api_key, base_url)?;
            screen(llm, entities, scoring, &args.resume, &job_description).await
        }
        ProviderKind::Anthropic => {
            let llm = ClaudeProvider::new(api_key, base_url)?;
            screen(llm, entities, scoring, &args.resume, &job_description).await
        }
    };

    output_outcome(&outcome, &args)?;

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn screen(
    llm: impl LLMProvider + 'static,
    entities: EntityExtractor,
    scoring: ScoringConfig,
    resume: &Path,
    job_description: &str,
) -> PipelineOutcome {
    let pipeline = ScreeningPipeline::new(DocumentExtractor::new(), entities, llm, scoring);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Screening {}", resume.display()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = pipeline.run(resume, job_description).await;

    spinner.finish_and_clear();
    outcome
}

fn output_outcome(outcome: &PipelineOutcome, args: &Args) -> anyhow::Result<()> {
    let source = args.resume.display().to_string();
    let output = render_outcome(outcome, &args.format, &source)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn render_outcome(outcome: &PipelineOutcome, format: &str, source: &str) -> anyhow::Result<String> {
    Ok(match format {
        "json" => serde_json::to_string_pretty(outcome)?,
        "markdown" => format_markdown(outcome, source),
        _ => format_text(outcome, source),
    })
}

fn format_text(outcome: &PipelineOutcome, source: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== Resume Screening: {} ===\n\n", source));

    match outcome {
        PipelineOutcome::Success {
            entities,
            score,
            feedback,
        } => {
            output.push_str("Extracted Entities:\n");
            for category in EntityCategory::ALL {
                output.push_str(&format!("  {}: {}\n", category, entities.joined(category)));
            }
            output.push_str(&format!("\nScore: {}/100\n", score));
            output.push_str(&format!("Feedback: {}\n", feedback));
        }
        PipelineOutcome::Failure { error } => {
            output.push_str(&format!("Error: {}\n", error));
        }
    }

    output.push_str(&format!(
        "\nAnalyzed on: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn format_markdown(outcome: &PipelineOutcome, source: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Resume Screening: {}\n\n", source));

    match outcome {
        PipelineOutcome::Success {
            entities,
            score,
            feedback,
        } => {
            output.push_str(&format!("**Score:** {}/100\n\n", score));

            output.push_str("## Extracted Entities\n\n");
            output.push_str("| Category | Values |\n|----------|--------|\n");
            for category in EntityCategory::ALL {
                output.push_str(&format!("| {} | {} |\n", category, entities.joined(category)));
            }

            output.push_str("\n## Feedback\n\n");
            output.push_str(feedback);
            output.push('\n');
        }
        PipelineOutcome::Failure { error } => {
            output.push_str(&format!("**Error:** {}\n", error));
        }
    }

    output.push_str(&format!(
        "\n---\n*Analyzed on {}*\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use resumescore::EntitySet;

    fn success() -> PipelineOutcome {
        let mut entities = EntitySet::new();
        entities.insert(EntityCategory::Skills, "sql");
        entities.insert(EntityCategory::Skills, "python");
        entities.insert(EntityCategory::Organizations, "Initech Inc");
        entities.insert(EntityCategory::Emails, "jane@example.com");
        PipelineOutcome::Success {
            entities,
            score: 78.0,
            feedback: "Good SQL depth.".to_string(),
        }
    }

    fn failure() -> PipelineOutcome {
        PipelineOutcome::Failure {
            error: "Text extraction failed: bad xref".to_string(),
        }
    }

    #[test]
    fn test_text_report_for_success() {
        let output = format_text(&success(), "resume.pdf");
        assert!(output.contains("=== Resume Screening: resume.pdf ==="));
        assert!(output.contains("  Skills: python, sql\n"));
        assert!(output.contains("  Organizations: Initech Inc\n"));
        assert!(output.contains("  Dates: \n"));
        assert!(output.contains("  Emails: jane@example.com\n"));
        assert!(output.contains("Score: 78/100\n"));
        assert!(output.contains("Feedback: Good SQL depth.\n"));
    }

    #[test]
    fn test_text_report_for_failure() {
        let output = format_text(&failure(), "resume.pdf");
        assert!(output.contains("Error: Text extraction failed: bad xref"));
        assert!(!output.contains("/100"));
    }

    #[test]
    fn test_markdown_report_rows() {
        let output = format_markdown(&success(), "resume.pdf");
        assert!(output.contains("**Score:** 78/100"));
        assert!(output.contains("| Skills | python, sql |\n"));
        assert!(output.contains("| Organizations | Initech Inc |\n"));
        assert!(output.contains("| Dates |  |\n"));
        assert!(output.contains("## Feedback\n\nGood SQL depth.\n"));

        let failed = format_markdown(&failure(), "resume.pdf");
        assert!(failed.contains("**Error:** Text extraction failed: bad xref"));
    }

    #[test]
    fn test_json_report() {
        let output = render_outcome(&success(), "json", "resume.pdf").unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["score"], 78.0);
        assert_eq!(json["entities"]["skills"][1], "sql");

        let output = render_outcome(&failure(), "json", "resume.pdf").unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["outcome"], "failure");
        assert!(json.get("entities").is_none());
    }

    #[test]
    fn test_unknown_format_falls_back_to_text() {
        let output = render_outcome(&success(), "yaml", "resume.pdf").unwrap();
        assert!(output.contains("Score: 78/100"));
    }
}
