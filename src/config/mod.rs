//! Configuration module for Sporre.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AgentPrompts, Prompts};
pub use settings::{
    AgentSettings, CorpusSettings, GeneralSettings, IngestionSettings, RetrievalSettings, Settings,
};
