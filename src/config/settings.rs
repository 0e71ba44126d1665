//! Configuration settings for Sporre.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub corpus: CorpusSettings,
    pub ingestion: IngestionSettings,
    pub retrieval: RetrievalSettings,
    pub agent: AgentSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Path to the `.env` file holding the corpus handle.
    pub env_file: String,
    /// Company the assistant answers questions about.
    pub company_name: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.sporre".to_string(),
            env_file: "~/.sporre/.env".to_string(),
            company_name: "InsightNext".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Hosted corpus service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    /// Cloud project that owns the corpus. Falls back to GOOGLE_CLOUD_PROJECT.
    pub project_id: Option<String>,
    /// Region the corpus lives in.
    pub location: String,
    /// Display name used when creating a corpus.
    pub display_name: String,
    /// Base URL of the corpus API. `{location}` is substituted.
    pub base_url: String,
    /// Embedding model the service uses for new corpora.
    pub embedding_model: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            project_id: None,
            location: "us-central1".to_string(),
            display_name: "sporre-services-corpus".to_string(),
            base_url: "https://{location}-aiplatform.googleapis.com/v1beta1".to_string(),
            embedding_model: "publishers/google/models/text-embedding-005".to_string(),
        }
    }
}

impl CorpusSettings {
    /// Resolve the project id from settings or the environment.
    pub fn project_id(&self) -> Option<String> {
        self.project_id
            .clone()
            .or_else(|| std::env::var("GOOGLE_CLOUD_PROJECT").ok().filter(|p| !p.is_empty()))
    }

    /// Base URL with the location substituted.
    pub fn resolved_base_url(&self) -> String {
        self.base_url.replace("{location}", &self.location)
    }
}

/// File ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    /// Chunk size the service applies at import time.
    pub chunk_size: u32,
    /// Chunk overlap the service applies at import time.
    pub chunk_overlap: u32,
    /// Above this many files, import the containing folder instead.
    pub folder_import_threshold: usize,
    /// Rate cap passed to the import call.
    pub max_embedding_requests_per_min: u32,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 100,
            folder_import_threshold: 25,
            max_embedding_requests_per_min: 1000,
        }
    }
}

/// Similarity retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of contexts to retrieve per query.
    pub top_k: u32,
    /// Maximum vector distance for a context to be returned.
    pub vector_distance_threshold: f64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            vector_distance_threshold: 0.5,
        }
    }
}

/// Agent generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Chat model used for the agent loop.
    pub model: String,
    /// Sampling temperature. Low keeps answers focused and professional.
    pub temperature: f32,
    /// Maximum output tokens per response.
    pub max_tokens: u32,
    /// Maximum tool-calling iterations per request.
    pub max_iterations: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            max_tokens: 8192,
            max_iterations: 10,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SporreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sporre")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded `.env` file path.
    pub fn env_file(&self) -> PathBuf {
        Self::expand_path(&self.general.env_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_limits() {
        let settings = Settings::default();
        assert_eq!(settings.ingestion.chunk_size, 512);
        assert_eq!(settings.ingestion.chunk_overlap, 100);
        assert_eq!(settings.ingestion.folder_import_threshold, 25);
        assert_eq!(settings.retrieval.top_k, 5);
        assert!((settings.retrieval.vector_distance_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_base_url_location_substitution() {
        let corpus = CorpusSettings {
            location: "europe-west4".to_string(),
            ..Default::default()
        };
        assert_eq!(
            corpus.resolved_base_url(),
            "https://europe-west4-aiplatform.googleapis.com/v1beta1"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings =
            toml::from_str("[agent]\nmodel = \"gpt-4o\"\n").unwrap();
        assert_eq!(settings.agent.model, "gpt-4o");
        assert_eq!(settings.agent.max_iterations, 10);
        assert_eq!(settings.corpus.location, "us-central1");
    }
}
