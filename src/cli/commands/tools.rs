//! Tools command - exercise the agent's tool adapters directly.
//!
//! Runs each of the three adapters end to end against the live corpus and
//! prints whatever they return. Useful for verifying the corpus wiring
//! without involving the LLM.

use crate::agent::{ToolCall, ToolContext};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;

/// Run all three tool adapters and print their output.
pub async fn run_tools(query: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Corpus, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'sporre doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let ctx = ToolContext::new(settings);

    Output::header("Tool Adapter Check");

    let steps = vec![
        (
            "corpus_info",
            ToolCall::CorpusInfo,
        ),
        (
            "query_corpus",
            ToolCall::QueryCorpus {
                query: query.to_string(),
                top_k: 5,
            },
        ),
        (
            "refresh_corpus",
            ToolCall::RefreshCorpus,
        ),
    ];

    for (name, call) in steps {
        println!("\n{}", style(name).bold().cyan());
        let result = ctx.execute(&call).await;
        println!("{}", result);
    }

    println!();
    Output::success("Tool adapter check complete.");

    Ok(())
}
