//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            set_value(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a dotted-key assignment to the settings.
fn set_value(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.company_name" => settings.general.company_name = value.to_string(),
        "general.env_file" => settings.general.env_file = value.to_string(),
        "general.log_level" => settings.general.log_level = value.to_string(),
        "corpus.project_id" => settings.corpus.project_id = Some(value.to_string()),
        "corpus.location" => settings.corpus.location = value.to_string(),
        "corpus.display_name" => settings.corpus.display_name = value.to_string(),
        "corpus.embedding_model" => settings.corpus.embedding_model = value.to_string(),
        "retrieval.top_k" => settings.retrieval.top_k = value.parse()?,
        "retrieval.vector_distance_threshold" => {
            settings.retrieval.vector_distance_threshold = value.parse()?
        }
        "ingestion.folder_import_threshold" => {
            settings.ingestion.folder_import_threshold = value.parse()?
        }
        "agent.model" => settings.agent.model = value.to_string(),
        "agent.temperature" => settings.agent.temperature = value.parse()?,
        "agent.max_tokens" => settings.agent.max_tokens = value.parse()?,
        "agent.max_iterations" => settings.agent.max_iterations = value.parse()?,
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_keys() {
        let mut settings = Settings::default();
        set_value(&mut settings, "agent.model", "gpt-4o").unwrap();
        set_value(&mut settings, "retrieval.top_k", "8").unwrap();
        assert_eq!(settings.agent.model, "gpt-4o");
        assert_eq!(settings.retrieval.top_k, 8);
    }

    #[test]
    fn test_set_unknown_key_rejected() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "nope.nope", "x").is_err());
    }

    #[test]
    fn test_set_bad_number_rejected() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "retrieval.top_k", "many").is_err());
    }
}
