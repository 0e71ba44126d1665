//! REST client for the hosted corpus service.
//!
//! Every method is a single request/response exchange; the service owns the
//! corpus lifecycle, embedding, chunking, and similarity search. Request and
//! response shapes follow the Vertex-AI-style RAG surface.

use crate::error::{Result, SporreError};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default timeout for corpus API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Env vars checked (in order) for the bearer token.
const TOKEN_VARS: [&str; 2] = ["CORPUS_API_TOKEN", "GOOGLE_ACCESS_TOKEN"];

/// Summary of a corpus as returned by list/get calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusSummary {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

/// A single retrieved context from a similarity query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedContext {
    #[serde(default)]
    pub source_uri: Option<String>,
    #[serde(default)]
    pub source_display_name: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCorporaResponse {
    #[serde(default)]
    rag_corpora: Vec<CorpusSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFilesResponse {
    #[serde(default)]
    rag_files: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveContextsResponse {
    #[serde(default)]
    contexts: ContextList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextList {
    #[serde(default)]
    contexts: Vec<RetrievedContext>,
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    name: String,
}

/// Thin client for the corpus REST API.
pub struct RagClient {
    http: reqwest::Client,
    base_url: String,
    parent: String,
}

impl RagClient {
    /// Create a client for a project/location pair.
    pub fn new(base_url: &str, project_id: &str, location: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            parent: format!("projects/{}/locations/{}", project_id, location),
        })
    }

    fn token() -> Result<String> {
        for var in TOKEN_VARS {
            if let Ok(token) = std::env::var(var) {
                if !token.is_empty() {
                    return Ok(token);
                }
            }
        }
        Err(SporreError::Config(format!(
            "No corpus API token found. Set {} in your environment.",
            TOKEN_VARS[0]
        )))
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(SporreError::Corpus(format!(
            "API returned {}: {}",
            status,
            body.chars().take(500).collect::<String>()
        )))
    }

    /// Create a corpus and return its resource name.
    pub async fn create_corpus(
        &self,
        display_name: &str,
        embedding_model: &str,
    ) -> Result<String> {
        let url = format!("{}/{}/ragCorpora", self.base_url, self.parent);
        let body = serde_json::json!({
            "displayName": display_name,
            "backendConfig": {
                "ragEmbeddingModelConfig": {
                    "vertexPredictionEndpoint": {
                        "publisherModel": embedding_model,
                    }
                }
            }
        });

        debug!(display_name, "Creating corpus");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(Self::token()?)
            .json(&body)
            .send()
            .await?;
        let op: OperationResponse = Self::check(resp).await?.json().await?;

        // Create returns a long-running operation named under the corpus;
        // the corpus resource name is the part before "/operations".
        let corpus_name = op
            .name
            .split("/operations")
            .next()
            .unwrap_or(&op.name)
            .to_string();

        Ok(corpus_name)
    }

    /// List all corpora under the project/location.
    pub async fn list_corpora(&self) -> Result<Vec<CorpusSummary>> {
        let url = format!("{}/{}/ragCorpora", self.base_url, self.parent);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(Self::token()?)
            .send()
            .await?;
        let list: ListCorporaResponse = Self::check(resp).await?.json().await?;
        Ok(list.rag_corpora)
    }

    /// Get details for one corpus by resource name.
    pub async fn get_corpus(&self, corpus_name: &str) -> Result<CorpusSummary> {
        let url = format!("{}/{}", self.base_url, corpus_name);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(Self::token()?)
            .send()
            .await?;
        let corpus: CorpusSummary = Self::check(resp).await?.json().await?;
        Ok(corpus)
    }

    /// Count files in a corpus.
    pub async fn count_files(&self, corpus_name: &str) -> Result<usize> {
        let url = format!("{}/{}/ragFiles", self.base_url, corpus_name);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(Self::token()?)
            .send()
            .await?;
        let list: ListFilesResponse = Self::check(resp).await?.json().await?;
        Ok(list.rag_files.len())
    }

    /// Import files (or folder prefixes) into a corpus.
    ///
    /// The service performs chunking and embedding; this call only names the
    /// sources and the transformation parameters.
    pub async fn import_files(
        &self,
        corpus_name: &str,
        uris: &[String],
        chunk_size: u32,
        chunk_overlap: u32,
        max_embedding_requests_per_min: u32,
    ) -> Result<()> {
        let url = format!("{}/{}/ragFiles:import", self.base_url, corpus_name);
        let body = serde_json::json!({
            "importRagFilesConfig": {
                "gcsSource": { "uris": uris },
                "ragFileTransformationConfig": {
                    "ragFileChunkingConfig": {
                        "fixedLengthChunking": {
                            "chunkSize": chunk_size,
                            "chunkOverlap": chunk_overlap,
                        }
                    }
                },
                "maxEmbeddingRequestsPerMin": max_embedding_requests_per_min,
            }
        });

        debug!(corpus = corpus_name, count = uris.len(), "Importing files");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(Self::token()?)
            .json(&body)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Run a similarity query against a corpus.
    pub async fn retrieve_contexts(
        &self,
        corpus_name: &str,
        query: &str,
        top_k: u32,
        vector_distance_threshold: f64,
    ) -> Result<Vec<RetrievedContext>> {
        let url = format!("{}/{}:retrieveContexts", self.base_url, self.parent);
        let body = serde_json::json!({
            "vertexRagStore": {
                "ragResources": [{ "ragCorpus": corpus_name }],
                "vectorDistanceThreshold": vector_distance_threshold,
            },
            "query": {
                "text": query,
                "similarityTopK": top_k,
            }
        });

        debug!(corpus = corpus_name, query, "Retrieving contexts");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(Self::token()?)
            .json(&body)
            .send()
            .await?;
        let parsed: RetrieveContextsResponse = Self::check(resp).await?.json().await?;
        Ok(parsed.contexts.contexts)
    }

    /// Delete a corpus.
    pub async fn delete_corpus(&self, corpus_name: &str) -> Result<()> {
        let url = format!("{}/{}", self.base_url, corpus_name);

        debug!(corpus = corpus_name, "Deleting corpus");

        let resp = self
            .http
            .delete(&url)
            .bearer_auth(Self::token()?)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RagClient {
        std::env::set_var("CORPUS_API_TOKEN", "test-token");
        RagClient::new(&server.uri(), "acme", "us-central1").unwrap()
    }

    #[tokio::test]
    async fn test_create_corpus_strips_operation_suffix() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects/acme/locations/us-central1/ragCorpora"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/acme/locations/us-central1/ragCorpora/42/operations/7"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let name = client
            .create_corpus("test-corpus", "publishers/google/models/text-embedding-005")
            .await
            .unwrap();

        assert_eq!(name, "projects/acme/locations/us-central1/ragCorpora/42");
    }

    #[tokio::test]
    async fn test_retrieve_contexts_parses_nested_contexts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/projects/acme/locations/us-central1:retrieveContexts",
            ))
            .and(body_partial_json(serde_json::json!({
                "query": { "text": "services", "similarityTopK": 5 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "contexts": {
                    "contexts": [
                        { "text": "We offer analytics.", "sourceDisplayName": "services.md", "distance": 0.21 }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let contexts = client
            .retrieve_contexts("projects/acme/locations/us-central1/ragCorpora/42", "services", 5, 0.5)
            .await
            .unwrap();

        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].text, "We offer analytics.");
        assert_eq!(contexts[0].source_display_name.as_deref(), Some("services.md"));
    }

    #[tokio::test]
    async fn test_error_status_becomes_corpus_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("corpus not found"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .get_corpus("projects/acme/locations/us-central1/ragCorpora/99")
            .await
            .unwrap_err();

        match err {
            SporreError::Corpus(msg) => {
                assert!(msg.contains("404"));
                assert!(msg.contains("corpus not found"));
            }
            other => panic!("Expected Corpus error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_import_files_sends_chunking_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "importRagFilesConfig": {
                    "ragFileTransformationConfig": {
                        "ragFileChunkingConfig": {
                            "fixedLengthChunking": { "chunkSize": 512, "chunkOverlap": 100 }
                        }
                    },
                    "maxEmbeddingRequestsPerMin": 1000
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "op"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .import_files(
                "projects/acme/locations/us-central1/ragCorpora/42",
                &["gs://bucket/docs/a.md".to_string()],
                512,
                100,
                1000,
            )
            .await
            .unwrap();
    }
}
