//! Error types for Sporre.

use thiserror::Error;

/// Library-level error type for Sporre operations.
#[derive(Error, Debug)]
pub enum SporreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corpus service error: {0}")]
    Corpus(String),

    #[error("No RAG corpus configured. Create one with 'sporre corpus create' or set RAG_CORPUS_NAME in your .env file.")]
    CorpusMissing,

    #[error("Env file error: {0}")]
    EnvFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Sporre operations.
pub type Result<T> = std::result::Result<T, SporreError>;
