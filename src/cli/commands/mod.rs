//! Command implementations.

mod ask;
mod chat;
mod config;
mod corpus;
mod doctor;
mod init;
mod tools;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use corpus::run_corpus;
pub use doctor::run_doctor;
pub use init::run_init;
pub use tools::run_tools;
