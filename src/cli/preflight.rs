//! Pre-flight checks before operations that hit external services.
//!
//! Validates that the required credentials are present before starting calls
//! that would otherwise fail midway with an opaque HTTP error.

use crate::config::Settings;
use crate::error::{Result, SporreError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Agent runs need the LLM key and corpus credentials.
    Agent,
    /// Direct corpus operations need corpus credentials only.
    Corpus,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Agent => {
            check_llm_key()?;
            check_corpus_credentials(settings)?;
        }
        Operation::Corpus => {
            check_corpus_credentials(settings)?;
        }
    }
    Ok(())
}

/// Check if the LLM API key is configured.
fn check_llm_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SporreError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(SporreError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check project and token for the corpus service.
fn check_corpus_credentials(settings: &Settings) -> Result<()> {
    if settings.corpus.project_id().is_none() {
        return Err(SporreError::Config(
            "No project configured. Set corpus.project_id or GOOGLE_CLOUD_PROJECT.".to_string(),
        ));
    }

    let has_token = ["CORPUS_API_TOKEN", "GOOGLE_ACCESS_TOKEN"]
        .iter()
        .any(|var| std::env::var(var).map(|v| !v.is_empty()).unwrap_or(false));

    if !has_token {
        return Err(SporreError::Config(
            "No corpus API token found. Set CORPUS_API_TOKEN in your environment.".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_check_fails_without_project() {
        let mut settings = Settings::default();
        settings.corpus.project_id = None;
        std::env::remove_var("GOOGLE_CLOUD_PROJECT");

        let result = check_corpus_credentials(&settings);
        assert!(matches!(result, Err(SporreError::Config(_))));
    }
}
