//! Tool adapters exposing the corpus manager to the agent runtime.

use crate::config::Settings;
use crate::corpus::CorpusManager;
use crate::error::{Result, SporreError};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Available tools for the agent.
#[derive(Debug, Clone)]
pub enum ToolCall {
    /// Search the service knowledge base.
    QueryCorpus { query: String, top_k: u32 },

    /// Re-validate the knowledge base connection.
    RefreshCorpus,

    /// Report knowledge base status and metadata.
    CorpusInfo,
}

/// Tool execution context with lazy access to the shared corpus manager.
///
/// The manager is constructed on first tool use and reused for the rest of
/// the session; construction failures surface as tool results, not panics.
pub struct ToolContext {
    settings: Settings,
    manager: OnceCell<Arc<CorpusManager>>,
}

impl ToolContext {
    /// Create a context that builds the manager on first use.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            manager: OnceCell::new(),
        }
    }

    /// Create a context around an already-built manager.
    pub fn with_manager(settings: Settings, manager: Arc<CorpusManager>) -> Self {
        let cell = OnceCell::new();
        cell.set(manager).ok();
        Self {
            settings,
            manager: cell,
        }
    }

    async fn manager(&self) -> Result<&Arc<CorpusManager>> {
        self.manager
            .get_or_try_init(|| async {
                CorpusManager::from_settings(&self.settings).map(Arc::new)
            })
            .await
    }

    /// Execute a tool call, converting every failure into a displayable
    /// string. Nothing propagates past this boundary; the runtime only ever
    /// sees text.
    pub async fn execute(&self, tool: &ToolCall) -> String {
        let result = match tool {
            ToolCall::QueryCorpus { query, top_k } => self.execute_query(query, *top_k).await,
            ToolCall::RefreshCorpus => self.execute_refresh().await,
            ToolCall::CorpusInfo => self.execute_info().await,
        };

        match result {
            Ok(output) => output,
            Err(e) => format!("Error: {}", e),
        }
    }

    async fn execute_query(&self, query: &str, top_k: u32) -> Result<String> {
        let manager = self.manager().await?;
        manager.query(query, top_k).await
    }

    async fn execute_refresh(&self) -> Result<String> {
        let manager = self.manager().await?;

        // Refresh is a connection check: fetch info and report the outcome.
        let info = manager.corpus_info().await?;
        Ok(format!(
            "Knowledge base connection refreshed. Corpus: {}, Files: {}",
            info.corpus_name, info.file_count
        ))
    }

    async fn execute_info(&self) -> Result<String> {
        let manager = self.manager().await?;
        let info = manager.corpus_info().await?;

        Ok(format!(
            "Knowledge Base Information\n\
             Corpus: {}\n\
             Display name: {}\n\
             Files: {}\n\
             Location: {}\n\
             Project: {}\n\
             Created: {}\n\
             Updated: {}",
            info.corpus_name,
            info.display_name,
            info.file_count,
            info.location,
            info.project_id,
            info.create_time,
            info.update_time,
        ))
    }
}

/// Get function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "query_corpus".to_string(),
                description: Some(
                    "Search the service knowledge base for relevant information. \
                    Use this for any question about services, solutions, capabilities, \
                    methodology, team, or getting started."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The search query"
                        },
                        "top_k": {
                            "type": "integer",
                            "description": "Maximum number of results (default: 5)",
                            "default": 5
                        }
                    },
                    "required": ["query"]
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "refresh_corpus".to_string(),
                description: Some(
                    "Re-validate the knowledge base connection. \
                    Use this when retrieval appears to be failing."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {}
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "corpus_info".to_string(),
                description: Some(
                    "Get knowledge base status: file count, corpus details, and \
                    last update time."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {}
                })),
                strict: None,
            },
        },
    ]
}

/// Parse a tool call from the runtime's response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| SporreError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        "query_corpus" => {
            let query = args["query"]
                .as_str()
                .ok_or_else(|| SporreError::Agent("Missing 'query' argument".to_string()))?
                .to_string();
            let top_k = args["top_k"].as_u64().unwrap_or(5) as u32;
            Ok(ToolCall::QueryCorpus { query, top_k })
        }
        "refresh_corpus" => Ok(ToolCall::RefreshCorpus),
        "corpus_info" => Ok(ToolCall::CorpusInfo),
        _ => Err(SporreError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unusable_settings() -> Settings {
        // Points at nothing; manager construction fails without a project.
        let mut settings = Settings::default();
        settings.corpus.project_id = Some("test-project".to_string());
        settings.general.env_file = "/nonexistent-dir/.env".to_string();
        settings
    }

    #[test]
    fn test_parse_query_tool() {
        let tool =
            parse_tool_call("query_corpus", r#"{"query": "services", "top_k": 3}"#).unwrap();
        match tool {
            ToolCall::QueryCorpus { query, top_k } => {
                assert_eq!(query, "services");
                assert_eq!(top_k, 3);
            }
            _ => panic!("Expected QueryCorpus tool"),
        }
    }

    #[test]
    fn test_parse_query_tool_default_top_k() {
        let tool = parse_tool_call("query_corpus", r#"{"query": "pricing"}"#).unwrap();
        match tool {
            ToolCall::QueryCorpus { top_k, .. } => assert_eq!(top_k, 5),
            _ => panic!("Expected QueryCorpus tool"),
        }
    }

    #[test]
    fn test_parse_no_arg_tools() {
        assert!(matches!(
            parse_tool_call("refresh_corpus", "{}").unwrap(),
            ToolCall::RefreshCorpus
        ));
        assert!(matches!(
            parse_tool_call("corpus_info", "{}").unwrap(),
            ToolCall::CorpusInfo
        ));
    }

    #[test]
    fn test_parse_unknown_tool_rejected() {
        assert!(parse_tool_call("launch_missiles", "{}").is_err());
    }

    #[test]
    fn test_definitions_cover_all_tools() {
        let names: Vec<String> = tool_definitions()
            .into_iter()
            .map(|t| t.function.name)
            .collect();
        assert_eq!(names, vec!["query_corpus", "refresh_corpus", "corpus_info"]);
    }

    #[tokio::test]
    async fn test_all_tools_report_missing_corpus_consistently() {
        use crate::corpus::CorpusManager;

        // Manager with no handle: every adapter should surface the same
        // missing-corpus message.
        let dir = tempfile::tempdir().unwrap();
        let mut settings = unusable_settings();
        settings.general.env_file = dir.path().join(".env").display().to_string();
        std::env::remove_var(crate::env_file::CORPUS_NAME_VAR);

        let manager = Arc::new(CorpusManager::from_settings(&settings).unwrap());
        let ctx = ToolContext::with_manager(settings, manager);

        let query = ctx
            .execute(&ToolCall::QueryCorpus {
                query: "services".to_string(),
                top_k: 5,
            })
            .await;
        let refresh = ctx.execute(&ToolCall::RefreshCorpus).await;
        let info = ctx.execute(&ToolCall::CorpusInfo).await;

        for result in [&query, &refresh, &info] {
            assert!(
                result.contains("No RAG corpus configured"),
                "unexpected adapter output: {}",
                result
            );
        }
        // Identical wording across all three adapters.
        assert_eq!(query, refresh);
        assert_eq!(refresh, info);
    }

    #[tokio::test]
    async fn test_tool_errors_never_propagate() {
        let ctx = ToolContext::new(unusable_settings());

        // Empty query is invalid; the adapter must still return a string.
        let result = ctx
            .execute(&ToolCall::QueryCorpus {
                query: "  ".to_string(),
                top_k: 5,
            })
            .await;
        assert!(result.starts_with("Error:"), "got: {}", result);
    }
}
