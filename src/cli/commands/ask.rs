//! Ask command implementation.

use crate::agent::{Agent, ToolContext};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use anyhow::Result;

/// Run the ask command: a one-shot agent run with corpus tools.
pub async fn run_ask(question: &str, model: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Agent, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'sporre doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut agent_settings = settings.agent.clone();
    if let Some(m) = model {
        agent_settings.model = m;
    }

    let prompts = Prompts::for_company(&settings.general.company_name);
    let tools = ToolContext::new(settings);
    let agent = Agent::new(tools, &agent_settings, &prompts);

    let spinner = Output::spinner("Thinking...");

    match agent.run(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::info(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
                }
                println!();
            }

            Output::info(&format!("Completed in {} iteration(s)", response.iterations));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    // Tool arguments are arbitrary UTF-8; the cut must land on a char
    // boundary or slicing panics.
    let mut cut = max_len.saturating_sub(3);
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_unchanged() {
        assert_eq!(truncate("hello", 60), "hello");
    }

    #[test]
    fn test_truncate_long_ascii() {
        let s = "a".repeat(80);
        let out = truncate(&s, 60);
        assert_eq!(out.len(), 60);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte_on_char_boundary() {
        // Arguments JSON where the 57-byte cut falls inside a two-byte 'ø'.
        let s = format!(r#"{{"query": "a{}"}}"#, "ø".repeat(30));
        assert!(!s.is_char_boundary(57));

        let out = truncate(&s, 60);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 60);
        // Must be a valid string, i.e. the cut landed between chars.
        assert!(out.chars().count() > 0);
    }
}
