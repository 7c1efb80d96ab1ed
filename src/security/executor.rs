//! Confirm-then-execute gate.
//!
//! This module is the single place that decides whether a generated command
//! may run. The answer to the `[Y/n]` prompt defaults to yes.

/// The user's answer to the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Result of passing a command through the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionDecision {
    /// Command should be executed now
    Execute,
    /// Command must not be executed
    Cancel { reason: String },
}

/// Interpret a `[Y/n]` answer. Empty, `y` and `yes` (any case) confirm.
pub fn parse_confirmation(answer: &str) -> Confirmation {
    match answer.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Confirmation::Confirmed,
        _ => Confirmation::Declined,
    }
}

/// Decide whether `cmd` runs given the user's answer.
///
/// # Examples
/// ```
/// use shellgen::security::{Confirmation, ExecutionDecision, gate_command};
///
/// assert_eq!(gate_command("ls -la", Confirmation::Confirmed), ExecutionDecision::Execute);
/// assert!(matches!(
///     gate_command("rm file.txt", Confirmation::Declined),
///     ExecutionDecision::Cancel { .. }
/// ));
/// ```
pub fn gate_command(cmd: &str, confirmation: Confirmation) -> ExecutionDecision {
    if cmd.trim().is_empty() {
        return ExecutionDecision::Cancel {
            reason: "Command is empty".to_string(),
        };
    }

    match confirmation {
        Confirmation::Confirmed => ExecutionDecision::Execute,
        Confirmation::Declined => ExecutionDecision::Cancel {
            reason: format!("Command '{}' was declined by the user", cmd),
        },
    }
}
