//! CLI module for Sporre.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Sporre - Service Q&A Assistant
///
/// A CLI assistant that answers questions about your company's services,
/// backed by a hosted RAG corpus. The name "Sporre" comes from the Norwegian
/// word "spørre," meaning "to ask."
#[derive(Parser, Debug)]
#[command(name = "sporre")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Sporre and verify configuration
    Init,

    /// Check API keys, corpus handle, and configuration
    Doctor,

    /// Ask the assistant a question about your services
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive chat session
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Manage the hosted RAG corpus
    Corpus {
        #[command(subcommand)]
        action: CorpusAction,
    },

    /// Exercise the agent tools directly and print their output
    Tools {
        /// Query to run through the query tool
        #[arg(default_value = "services")]
        query: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CorpusAction {
    /// Create a new corpus and persist its handle
    Create,

    /// List all corpora in the project
    List,

    /// Show corpus metadata and file count
    Info,

    /// Import files into the corpus
    Ingest {
        /// File URIs to import (a folder prefix is used for large batches)
        paths: Vec<String>,
    },

    /// Run a similarity query against the corpus
    Query {
        /// Search query
        query: String,

        /// Number of contexts to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<u32>,
    },

    /// Delete the corpus and clear the persisted handle
    Delete {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "agent.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Show configuration file path
    Path,
}
