//! Security module for command risk checks and the confirmation gate.
//!
//! The risk check is lexical only: it flags commands that mention a
//! destructive verb, and the gate makes sure nothing runs unless the user
//! said yes.

mod analyzer;
pub mod executor;

pub use analyzer::{DESTRUCTIVE_VERBS, analyze_command};
pub use executor::{Confirmation, ExecutionDecision, gate_command, parse_confirmation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSafety {
    Safe,
    Warn(Vec<String>), // destructive verbs found in the command
}

impl CommandSafety {
    pub fn is_risky(&self) -> bool {
        matches!(self, CommandSafety::Warn(_))
    }
}
