//! Shell execution module.
//!
//! Runs the confirmed command in a subshell with the user's terminal
//! attached and reports how it ended.

mod runner;
pub use runner::{CommandRunner, RunOutcome, ShellRunner};
