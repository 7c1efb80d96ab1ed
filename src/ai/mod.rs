//! AI module for turning natural language into a shell command.
//!
//! This module builds the model request, runs the local model runtime,
//! downloads missing model files, and parses the model's reply.

pub mod client;
pub mod download;
pub mod parser;
pub mod prompt;
pub mod runtime;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::{AiClient, CommandSource};
pub use runtime::{LocalRuntime, RuntimeConfig};
