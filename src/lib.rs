//! Sporre - Service Q&A Assistant
//!
//! A CLI assistant that answers questions about your company's services.
//!
//! The name "Sporre" comes from the Norwegian word "spørre," meaning "to ask."
//!
//! # Overview
//!
//! Sporre delegates the heavy lifting to hosted services:
//! - Retrieval goes through a managed vector-search corpus (create, ingest,
//!   query, delete are single REST calls)
//! - Generation goes through a hosted chat-completions API with tool calling
//!
//! Nothing is embedded, chunked, or indexed locally. The crate is the glue
//! between a corpus handle stored in a `.env` file and the two services.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt templates
//! - `env_file` - `.env` persistence of the corpus handle
//! - `corpus` - Managed corpus client and manager
//! - `agent` - LLM agent with corpus tools
//! - `llm` - Hosted LLM client construction
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use sporre::config::Settings;
//! use sporre::corpus::CorpusManager;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let manager = CorpusManager::from_settings(&settings)?;
//!
//!     let answer = manager.query("What services do you offer?", 5).await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod env_file;
pub mod error;
pub mod llm;

pub use error::{Result, SporreError};
