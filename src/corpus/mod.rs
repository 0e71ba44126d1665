//! Managed corpus integration.
//!
//! Retrieval is fully delegated to a hosted vector-search corpus. This module
//! holds the REST client for that service and the manager that owns the
//! corpus handle, persists it to the `.env` file, and exposes the operations
//! the agent tools need.

mod client;
mod manager;

pub use client::{CorpusSummary, RagClient, RetrievedContext};
pub use manager::{CorpusInfo, CorpusManager, IngestPlan};
