//! Corpus command implementation: direct manager operations.

use crate::cli::preflight::{self, Operation};
use crate::cli::{CorpusAction, Output};
use crate::config::Settings;
use crate::corpus::CorpusManager;
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Run a corpus subcommand.
pub async fn run_corpus(action: &CorpusAction, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Corpus, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'sporre doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let manager = CorpusManager::from_settings(&settings)?;

    match action {
        CorpusAction::Create => {
            if let Some(existing) = manager.corpus_name() {
                Output::warning(&format!("A corpus is already configured: {}", existing));
                Output::info("Delete it first with 'sporre corpus delete' to start over.");
                return Ok(());
            }

            let spinner = Output::spinner("Creating corpus...");
            let name = manager.create_corpus().await?;
            spinner.finish_and_clear();

            Output::success(&format!("Created corpus: {}", name));
            Output::info("Handle saved to the .env file.");
        }

        CorpusAction::List => {
            let spinner = Output::spinner("Listing corpora...");
            let corpora = manager.list_corpora().await?;
            spinner.finish_and_clear();

            if corpora.is_empty() {
                Output::info("No corpora found in this project.");
                return Ok(());
            }

            Output::header(&format!("Corpora ({})", corpora.len()));
            for corpus in &corpora {
                Output::corpus_line(
                    &corpus.display_name,
                    &corpus.name,
                    &format_timestamp(corpus.create_time.as_deref()),
                );
            }
        }

        CorpusAction::Info => {
            let spinner = Output::spinner("Fetching corpus info...");
            let info = manager.corpus_info().await?;
            spinner.finish_and_clear();

            Output::header("Corpus Information");
            Output::kv("Corpus", &info.corpus_name);
            Output::kv("Display name", &info.display_name);
            Output::kv("Files", &info.file_count.to_string());
            Output::kv("Location", &info.location);
            Output::kv("Project", &info.project_id);
            Output::kv("Created", &format_timestamp(Some(&info.create_time)));
            Output::kv("Updated", &format_timestamp(Some(&info.update_time)));
        }

        CorpusAction::Ingest { paths } => {
            let spinner = Output::spinner(&format!("Ingesting {} path(s)...", paths.len()));
            let count = manager.ingest_files(paths).await?;
            spinner.finish_and_clear();

            Output::success(&format!("Import complete. Corpus now contains {} files.", count));
        }

        CorpusAction::Query { query, top_k } => {
            let top_k = top_k.unwrap_or_else(|| manager.default_top_k());

            let spinner = Output::spinner("Querying corpus...");
            let result = manager.query(query, top_k).await?;
            spinner.finish_and_clear();

            println!("\n{}\n", result);
        }

        CorpusAction::Delete { yes } => {
            let Some(name) = manager.corpus_name() else {
                Output::info("No corpus configured; nothing to delete.");
                return Ok(());
            };

            if !yes && !confirm(&format!("Delete corpus {}? This cannot be undone.", name))? {
                Output::info("Aborted.");
                return Ok(());
            }

            let spinner = Output::spinner("Deleting corpus...");
            manager.delete_corpus().await?;
            spinner.finish_and_clear();

            Output::success("Corpus deleted and handle cleared.");
        }
    }

    Ok(())
}

/// Render a service timestamp (RFC 3339) in a compact local form.
fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "unknown".to_string();
    };

    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(&chrono::Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        // The service owns the format; fall back to whatever it sent.
        Err(_) => raw.to_string(),
    }
}

/// Prompt for confirmation (y/n).
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_rfc3339() {
        assert_eq!(
            format_timestamp(Some("2025-03-14T09:26:53Z")),
            "2025-03-14 09:26 UTC"
        );
    }

    #[test]
    fn test_format_timestamp_passthrough_and_missing() {
        assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
        assert_eq!(format_timestamp(None), "unknown");
    }
}
