//! Corpus manager: owns the corpus handle and wraps the service calls.
//!
//! The handle is an opaque resource name sourced from the environment (via
//! the `.env` file) and written back whenever a corpus is created or deleted.
//! Nothing is cached; info and counts are re-fetched on every call.

use super::client::{CorpusSummary, RagClient};
use crate::config::Settings;
use crate::env_file::{self, CORPUS_NAME_VAR};
use crate::error::{Result, SporreError};
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{info, warn};

/// Read-only projection of corpus metadata, rebuilt on every call.
#[derive(Debug, Clone)]
pub struct CorpusInfo {
    pub corpus_name: String,
    pub display_name: String,
    pub create_time: String,
    pub update_time: String,
    pub file_count: usize,
    pub location: String,
    pub project_id: String,
}

/// How a batch of files will be imported.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestPlan {
    /// Import each file individually.
    PerFile(Vec<String>),
    /// Import the containing folder as a single prefix.
    Folder(String),
}

impl IngestPlan {
    /// The URIs the import call will name.
    pub fn uris(&self) -> Vec<String> {
        match self {
            IngestPlan::PerFile(paths) => paths.clone(),
            IngestPlan::Folder(folder) => vec![folder.clone()],
        }
    }
}

/// Manages the hosted corpus for service content.
pub struct CorpusManager {
    client: RagClient,
    corpus_name: RwLock<Option<String>>,
    display_name: String,
    embedding_model: String,
    location: String,
    project_id: String,
    env_path: PathBuf,
    chunk_size: u32,
    chunk_overlap: u32,
    folder_import_threshold: usize,
    max_embedding_requests_per_min: u32,
    top_k: u32,
    vector_distance_threshold: f64,
}

impl CorpusManager {
    /// Build a manager from settings, picking up an existing handle from the
    /// `.env` file or the process environment.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let project_id = settings.corpus.project_id().ok_or_else(|| {
            SporreError::Config(
                "No project configured. Set corpus.project_id or GOOGLE_CLOUD_PROJECT.".to_string(),
            )
        })?;

        let client = RagClient::new(
            &settings.corpus.resolved_base_url(),
            &project_id,
            &settings.corpus.location,
        )?;

        let env_path = settings.env_file();
        env_file::load(&env_path)?;

        let corpus_name = env_file::read_var(&env_path, CORPUS_NAME_VAR)?
            .or_else(|| std::env::var(CORPUS_NAME_VAR).ok())
            .filter(|name| !name.trim().is_empty());

        if let Some(ref name) = corpus_name {
            info!("Using existing corpus: {}", name);
        }

        Ok(Self {
            client,
            corpus_name: RwLock::new(corpus_name),
            display_name: settings.corpus.display_name.clone(),
            embedding_model: settings.corpus.embedding_model.clone(),
            location: settings.corpus.location.clone(),
            project_id,
            env_path,
            chunk_size: settings.ingestion.chunk_size,
            chunk_overlap: settings.ingestion.chunk_overlap,
            folder_import_threshold: settings.ingestion.folder_import_threshold,
            max_embedding_requests_per_min: settings.ingestion.max_embedding_requests_per_min,
            top_k: settings.retrieval.top_k,
            vector_distance_threshold: settings.retrieval.vector_distance_threshold,
        })
    }

    /// The current corpus handle, if any.
    pub fn corpus_name(&self) -> Option<String> {
        self.corpus_name.read().expect("corpus name lock").clone()
    }

    /// Default retrieval depth from settings.
    pub fn default_top_k(&self) -> u32 {
        self.top_k
    }

    fn require_corpus(&self) -> Result<String> {
        self.corpus_name().ok_or(SporreError::CorpusMissing)
    }

    fn store_corpus_name(&self, name: Option<String>) -> Result<()> {
        let value = name.clone().unwrap_or_default();
        env_file::set_var(&self.env_path, CORPUS_NAME_VAR, &value)?;
        *self.corpus_name.write().expect("corpus name lock") = name;
        Ok(())
    }

    /// Create a new corpus and persist its handle to the `.env` file.
    pub async fn create_corpus(&self) -> Result<String> {
        info!("Creating corpus: {}", self.display_name);

        let name = self
            .client
            .create_corpus(&self.display_name, &self.embedding_model)
            .await?;

        self.store_corpus_name(Some(name.clone()))?;
        info!("Created corpus: {}", name);
        Ok(name)
    }

    /// List all corpora in the project/location.
    pub async fn list_corpora(&self) -> Result<Vec<CorpusSummary>> {
        self.client.list_corpora().await
    }

    /// Fetch metadata and file count for the current corpus.
    pub async fn corpus_info(&self) -> Result<CorpusInfo> {
        let name = self.require_corpus()?;

        let corpus = self.client.get_corpus(&name).await?;
        let file_count = self.client.count_files(&name).await?;

        Ok(CorpusInfo {
            corpus_name: name,
            display_name: corpus.display_name,
            create_time: corpus.create_time.unwrap_or_else(|| "unknown".to_string()),
            update_time: corpus.update_time.unwrap_or_else(|| "unknown".to_string()),
            file_count,
            location: self.location.clone(),
            project_id: self.project_id.clone(),
        })
    }

    /// Decide between per-file and folder import for a batch of paths.
    ///
    /// Large batches are imported by folder prefix: the service handles a
    /// folder in one request, where a long explicit file list would not fit.
    pub fn plan_ingest(&self, paths: &[String]) -> Result<IngestPlan> {
        if paths.is_empty() {
            return Err(SporreError::InvalidInput(
                "No files to ingest.".to_string(),
            ));
        }

        if paths.len() > self.folder_import_threshold {
            let first = &paths[0];
            let folder = match first.rsplit_once('/') {
                Some((parent, _)) => format!("{}/", parent),
                None => {
                    return Err(SporreError::InvalidInput(format!(
                        "Cannot derive a folder from path: {}",
                        first
                    )))
                }
            };
            Ok(IngestPlan::Folder(folder))
        } else {
            Ok(IngestPlan::PerFile(paths.to_vec()))
        }
    }

    /// Ingest files into the corpus; returns the file count after import.
    pub async fn ingest_files(&self, paths: &[String]) -> Result<usize> {
        let name = self.require_corpus()?;
        let plan = self.plan_ingest(paths)?;

        match &plan {
            IngestPlan::PerFile(files) => {
                info!("Ingesting {} files into {}", files.len(), name);
            }
            IngestPlan::Folder(folder) => {
                info!("Ingesting folder {} into {}", folder, name);
            }
        }

        self.client
            .import_files(
                &name,
                &plan.uris(),
                self.chunk_size,
                self.chunk_overlap,
                self.max_embedding_requests_per_min,
            )
            .await?;

        let count = self.client.count_files(&name).await?;
        info!("Corpus now contains {} files", count);
        Ok(count)
    }

    /// Run a similarity query and format the retrieved contexts.
    pub async fn query(&self, query: &str, top_k: u32) -> Result<String> {
        if query.trim().is_empty() {
            return Err(SporreError::InvalidInput(
                "Query cannot be empty.".to_string(),
            ));
        }

        let name = self.require_corpus()?;

        let contexts = self
            .client
            .retrieve_contexts(&name, query, top_k, self.vector_distance_threshold)
            .await?;

        if contexts.is_empty() {
            return Ok("No relevant information found in the knowledge base.".to_string());
        }

        let formatted = contexts
            .iter()
            .enumerate()
            .map(|(i, ctx)| {
                let source = ctx
                    .source_display_name
                    .as_deref()
                    .or(ctx.source_uri.as_deref())
                    .unwrap_or("unknown source");
                match ctx.distance {
                    Some(d) => format!("{}. [{}] (distance {:.2})\n   {}", i + 1, source, d, ctx.text),
                    None => format!("{}. [{}]\n   {}", i + 1, source, ctx.text),
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(format!("Found {} results:\n\n{}", contexts.len(), formatted))
    }

    /// Delete the corpus and blank the persisted handle.
    pub async fn delete_corpus(&self) -> Result<()> {
        let Some(name) = self.corpus_name() else {
            warn!("No corpus to delete");
            return Ok(());
        };

        info!("Deleting corpus: {}", name);
        self.client.delete_corpus(&name).await?;
        self.store_corpus_name(None)?;
        info!("Corpus deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_manager(env_dir: &std::path::Path, corpus: Option<&str>) -> CorpusManager {
        let client = RagClient::new(
            "http://localhost:0/v1beta1",
            "test-project",
            "us-central1",
        )
        .unwrap();

        CorpusManager {
            client,
            corpus_name: RwLock::new(corpus.map(|c| c.to_string())),
            display_name: "test-corpus".to_string(),
            embedding_model: "publishers/google/models/text-embedding-005".to_string(),
            location: "us-central1".to_string(),
            project_id: "test-project".to_string(),
            env_path: env_dir.join(".env"),
            chunk_size: 512,
            chunk_overlap: 100,
            folder_import_threshold: 25,
            max_embedding_requests_per_min: 1000,
            top_k: 5,
            vector_distance_threshold: 0.5,
        }
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_any_call() {
        let dir = tempdir().unwrap();
        // No corpus handle and an unroutable endpoint: if validation did not
        // come first, this would fail differently.
        let manager = test_manager(dir.path(), Some("projects/p/locations/l/ragCorpora/1"));

        let err = manager.query("   ", 5).await.unwrap_err();
        assert!(matches!(err, SporreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_query_without_corpus_reports_missing() {
        let dir = tempdir().unwrap();
        let manager = test_manager(dir.path(), None);

        let err = manager.query("services", 5).await.unwrap_err();
        assert!(matches!(err, SporreError::CorpusMissing));
    }

    #[tokio::test]
    async fn test_info_without_corpus_reports_missing() {
        let dir = tempdir().unwrap();
        let manager = test_manager(dir.path(), None);

        let err = manager.corpus_info().await.unwrap_err();
        assert!(matches!(err, SporreError::CorpusMissing));
    }

    #[test]
    fn test_plan_small_batch_imports_per_file() {
        let dir = tempdir().unwrap();
        let manager = test_manager(dir.path(), None);

        let paths: Vec<String> = (0..25).map(|i| format!("gs://bucket/docs/{}.md", i)).collect();
        let plan = manager.plan_ingest(&paths).unwrap();
        assert_eq!(plan, IngestPlan::PerFile(paths));
    }

    #[test]
    fn test_plan_large_batch_redirects_to_folder() {
        let dir = tempdir().unwrap();
        let manager = test_manager(dir.path(), None);

        let paths: Vec<String> = (0..26).map(|i| format!("gs://bucket/docs/{}.md", i)).collect();
        let plan = manager.plan_ingest(&paths).unwrap();
        assert_eq!(plan, IngestPlan::Folder("gs://bucket/docs/".to_string()));
        assert_eq!(plan.uris(), vec!["gs://bucket/docs/".to_string()]);
    }

    #[test]
    fn test_plan_empty_batch_is_invalid() {
        let dir = tempdir().unwrap();
        let manager = test_manager(dir.path(), None);
        assert!(matches!(
            manager.plan_ingest(&[]),
            Err(SporreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_store_corpus_name_round_trips_env_file() {
        let dir = tempdir().unwrap();
        let manager = test_manager(dir.path(), None);

        let handle = "projects/p/locations/l/ragCorpora/7";
        manager.store_corpus_name(Some(handle.to_string())).unwrap();

        assert_eq!(manager.corpus_name().as_deref(), Some(handle));
        assert_eq!(
            env_file::read_var(&dir.path().join(".env"), CORPUS_NAME_VAR)
                .unwrap()
                .as_deref(),
            Some(handle)
        );

        manager.store_corpus_name(None).unwrap();
        assert_eq!(manager.corpus_name(), None);
        assert_eq!(
            env_file::read_var(&dir.path().join(".env"), CORPUS_NAME_VAR)
                .unwrap()
                .as_deref(),
            Some("")
        );
    }
}
