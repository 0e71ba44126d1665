//! Agent runner with tool calling loop.
//!
//! The agent itself is declarative: a model name, a system prompt, the tool
//! list, and generation parameters. Conversation turns and tool dispatch are
//! driven by the hosted chat-completions runtime; this loop just relays tool
//! results back until the model produces a final answer.

use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use crate::config::{AgentSettings, Prompts};
use crate::error::{Result, SporreError};
use crate::llm::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use tracing::{debug, info};

/// Customer-facing agent backed by the corpus tools.
pub struct Agent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_iterations: usize,
    tools: ToolContext,
    system_prompt: String,
}

impl Agent {
    /// Create a new agent from settings and prompts.
    pub fn new(tools: ToolContext, settings: &AgentSettings, prompts: &Prompts) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            max_iterations: settings.max_iterations,
            tools,
            system_prompt: prompts.render(&prompts.agent.system),
        }
    }

    /// Run the agent on a single user message.
    pub async fn run(&self, message: &str) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| SporreError::Agent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(message.to_string())
                .build()
                .map_err(|e| SporreError::Agent(e.to_string()))?
                .into(),
        ];

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(SporreError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(tool_definitions())
                .temperature(self.temperature)
                .max_tokens(self.max_tokens)
                .build()
                .map_err(|e| SporreError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| SporreError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| SporreError::Agent("No response from model".to_string()))?;

            match choice.message.tool_calls {
                Some(ref tool_calls) if !tool_calls.is_empty() => {
                    let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                        .tool_calls(tool_calls.clone())
                        .build()
                        .map_err(|e| SporreError::Agent(e.to_string()))?;
                    messages.push(assistant_msg.into());

                    for tool_call in tool_calls {
                        let record = self.execute_tool_call(tool_call).await;

                        let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                            .tool_call_id(&tool_call.id)
                            .content(record.result.clone())
                            .build()
                            .map_err(|e| SporreError::Agent(e.to_string()))?;
                        messages.push(tool_msg.into());

                        tool_calls_made.push(record);
                    }
                }
                _ => {
                    let content = choice.message.content.clone().unwrap_or_default();
                    return Ok(AgentResponse {
                        content,
                        tool_calls: tool_calls_made,
                        iterations,
                    });
                }
            }
        }
    }

    /// Execute a single tool call and record it.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match parse_tool_call(name, arguments) {
            Ok(tool) => self.tools.execute(&tool).await,
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "query_corpus".to_string(),
            arguments: r#"{"query": "services"}"#.to_string(),
            result: "Found results".to_string(),
        };
        assert_eq!(
            format!("{}", record),
            r#"query_corpus({"query": "services"})"#
        );
    }
}
