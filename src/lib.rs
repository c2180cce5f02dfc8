//! ChatRelay - chat assistant backend library
//!
//! This library provides the server-side core of a browser chat assistant:
//! per-user model selection, a streaming relay to a hosted completion
//! gateway, and the date-binning helper the chat-history sidebar uses.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `models`: the closed catalog of selectable models
//! - `preferences`: per-user model preference store
//! - `history`: date binning for the history sidebar
//! - `gateway`: completion gateway trait and OpenAI-compatible client
//! - `server`: axum HTTP routes
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use chatrelay::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     config.validate()?;
//!
//!     // Server startup would go here
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod models;
pub mod preferences;
pub mod prompts;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{ChatRelayError, Result};
pub use history::{bin_by_date, Bin, HistoryItem};
pub use models::ModelId;
pub use preferences::ModelPreferenceStore;
