//! Agent system for customer-facing question answering.
//!
//! The agent is a static definition (model, system prompt, tool list,
//! generation parameters) driven by a hosted chat-completions runtime. The
//! tools wrap the corpus manager and always return displayable strings.

mod runner;
mod tools;

pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext};
