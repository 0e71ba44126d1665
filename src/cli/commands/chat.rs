//! Interactive chat command with tool calling support.

use crate::agent::{parse_tool_call, tool_definitions, ToolContext};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{AgentSettings, Prompts, Settings};
use crate::error::{Result, SporreError};
use crate::llm::create_client;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use console::style;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Agent, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'sporre doctor' for detailed diagnostics.");
        return Err(e);
    }

    let mut agent_settings = settings.agent.clone();
    if let Some(m) = model {
        agent_settings.model = m;
    }

    let prompts = Prompts::for_company(&settings.general.company_name);
    let tools = ToolContext::new(settings);

    let mut chat = ChatSession::new(tools, &agent_settings, &prompts);

    println!("\n{}", style("Sporre Chat").bold().cyan());
    println!("{}\n", prompts.render(&prompts.agent.welcome));
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        stdin.lock().read_line(&mut input)?;

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            chat.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        match chat.send_message(input).await {
            Ok(response) => {
                println!("\n{} {}\n", style("Sporre:").cyan().bold(), response);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}

/// Interactive chat session with tool calling support.
struct ChatSession {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    tools: ToolContext,
    messages: Vec<ChatCompletionRequestMessage>,
    max_tool_iterations: usize,
    system_prompt: String,
}

impl ChatSession {
    /// Create a new chat session.
    fn new(tools: ToolContext, settings: &AgentSettings, prompts: &Prompts) -> Self {
        let system_prompt = prompts.render(&prompts.agent.system);
        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt.clone())
            .build()
            .expect("Failed to build system message");

        Self {
            client: create_client(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            tools,
            messages: vec![system_message.into()],
            max_tool_iterations: settings.max_iterations,
            system_prompt,
        }
    }

    /// Reset the conversation, keeping only the system prompt.
    fn clear_history(&mut self) {
        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(self.system_prompt.clone())
            .build()
            .expect("Failed to build system message");
        self.messages = vec![system_message.into()];
    }

    /// Send a user message and drive tool calls until a final answer.
    async fn send_message(&mut self, message: &str) -> Result<String> {
        self.messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(message.to_string())
                .build()
                .map_err(|e| SporreError::Agent(e.to_string()))?
                .into(),
        );

        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > self.max_tool_iterations {
                return Err(SporreError::Agent(format!(
                    "Chat exceeded maximum tool iterations ({})",
                    self.max_tool_iterations
                )));
            }

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(self.messages.clone())
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
                .map_err(|e| SporreError::OpenAI(format!("Chat API error: {}", e)))?;

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
                    self.messages.push(assistant_msg.into());

                    for tool_call in tool_calls {
                        info!(
                            "Chat calling tool: {} with args: {}",
                            tool_call.function.name, tool_call.function.arguments
                        );

                        let result = match parse_tool_call(
                            &tool_call.function.name,
                            &tool_call.function.arguments,
                        ) {
                            Ok(tool) => self.tools.execute(&tool).await,
                            Err(e) => format!("Failed to parse tool call: {}", e),
                        };

                        let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                            .tool_call_id(&tool_call.id)
                            .content(result)
                            .build()
                            .map_err(|e| SporreError::Agent(e.to_string()))?;
                        self.messages.push(tool_msg.into());
                    }
                }
                _ => {
                    let content = choice.message.content.clone().unwrap_or_default();

                    // Keep the assistant turn in history for follow-ups.
                    let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                        .content(content.clone())
                        .build()
                        .map_err(|e| SporreError::Agent(e.to_string()))?;
                    self.messages.push(assistant_msg.into());

                    return Ok(content);
                }
            }
        }
    }
}
