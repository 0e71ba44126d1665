//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Sporre Setup");
    println!();
    println!("Welcome to Sporre! Let's make sure everything is configured correctly.\n");

    // Step 1: Check credentials
    println!("{}", style("Step 1: Checking credentials").bold().cyan());
    println!();

    if std::env::var("OPENAI_API_KEY").is_err() {
        Output::warning("OPENAI_API_KEY environment variable is not set.");
        println!();
        println!("  Sporre uses an OpenAI API key for the assistant's responses.");
        println!("  Set it in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'sporre init' again.");
            return Ok(());
        }
    } else {
        Output::success("OpenAI API key is configured!");
    }

    if settings.corpus.project_id().is_none() {
        Output::warning("No cloud project configured for the corpus service.");
        println!();
        println!("  Set it in your shell or in the config file:");
        println!("  {}", style("export GOOGLE_CLOUD_PROJECT='my-project'").green());
        println!();
    } else {
        Output::success("Cloud project is configured!");
    }

    println!();

    // Step 2: Create directories
    println!("{}", style("Step 2: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    println!();

    // Step 3: Create config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check credentials and corpus status", style("sporre doctor").cyan());
    println!("  {} Create the knowledge base corpus", style("sporre corpus create").cyan());
    println!("  {} Import your service content", style("sporre corpus ingest <uris>").cyan());
    println!("  {} Ask your first question", style("sporre ask \"What services do you offer?\"").cyan());
    println!();

    Ok(())
}

/// Prompt the user to continue (y/n).
fn prompt_continue(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
