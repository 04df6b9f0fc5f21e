use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
