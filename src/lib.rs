//! ShellGen - natural language to shell commands with a local model
//!
//! This library provides the pieces behind the `shellgen` binary:
//! - Prompt assembly and the client for a local OpenAI-compatible runtime
//! - Launching `llama-server` for a GGUF model and downloading missing models
//! - Sanitizing the model reply into a single command line
//! - A lexical risk check and the confirm-then-execute gate
//! - The INI configuration and its setup wizard
//!
//! # Example
//!
//! ```no_run
//! use shellgen::ai::{AiClient, CommandSource};
//! use shellgen::security::analyze_command;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AiClient::new("http://127.0.0.1:8080/v1", "Phi-3-mini-4k-instruct.Q4_0.gguf");
//!     let command = client.generate("show free disk space").await?;
//!
//!     if analyze_command(&command).is_risky() {
//!         eprintln!("careful: {}", command);
//!     }
//!     println!("{}", command);
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod app;
pub mod cli;
pub mod config;
pub mod security;
pub mod shell;
pub mod utils;

// Re-export commonly used types
pub use ai::{AiClient, CommandSource, LocalRuntime};
pub use app::{App, Outcome};
pub use cli::{Cli, Mode};
pub use config::Config;
