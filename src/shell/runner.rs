use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

const DEFAULT_SHELL: &str = "/bin/sh";

/// How an executed command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Exited(i32),
    Signaled(i32),
}

impl RunOutcome {
    fn from_status(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => RunOutcome::Exited(code),
            (None, Some(sig)) => RunOutcome::Signaled(sig),
            // Neither code nor signal only happens for stopped/continued children.
            (None, None) => RunOutcome::Exited(1),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, RunOutcome::Exited(0))
    }

    /// Exit code to hand back to our own caller, shell-style (128 + signal).
    pub fn exit_code(&self) -> u8 {
        let code = match *self {
            RunOutcome::Exited(code) => code,
            RunOutcome::Signaled(sig) => 128 + sig,
        };
        u8::try_from(code).unwrap_or(1)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Exited(code) => write!(f, "exited with status {}", code),
            RunOutcome::Signaled(sig) => write!(f, "terminated by signal {}", sig),
        }
    }
}

/// Executes a confirmed command.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&mut self, command: &str) -> Result<RunOutcome>;
}

/// Runs commands through `sh -c`, inheriting stdin/stdout/stderr.
pub struct ShellRunner {
    shell: String,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self { shell: shell.into() }
    }
}

impl CommandRunner for ShellRunner {
    async fn run(&mut self, command: &str) -> Result<RunOutcome> {
        info!(shell = %self.shell, command, "executing command");
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .status()
            .await
            .with_context(|| format!("Failed to spawn {}", self.shell))?;

        let outcome = RunOutcome::from_status(status);
        info!(%outcome, "command finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_success() {
        let outcome = ShellRunner::default().run("true").await.unwrap();
        assert_eq!(outcome, RunOutcome::Exited(0));
        assert!(outcome.success());
        assert_eq!(outcome.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_run_reports_exit_code() {
        let outcome = ShellRunner::default().run("exit 3").await.unwrap();
        assert_eq!(outcome, RunOutcome::Exited(3));
        assert!(!outcome.success());
        assert_eq!(outcome.exit_code(), 3);
        assert_eq!(outcome.to_string(), "exited with status 3");
    }

    #[tokio::test]
    async fn test_run_reports_signal() {
        let outcome = ShellRunner::default().run("kill -9 $$").await.unwrap();
        assert_eq!(outcome, RunOutcome::Signaled(9));
        assert_eq!(outcome.exit_code(), 137);
        assert_eq!(outcome.to_string(), "terminated by signal 9");
    }

    #[tokio::test]
    async fn test_run_uses_shell_features() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        let cmd = format!("echo one > '{0}' && echo two >> '{0}'", target.display());

        let outcome = ShellRunner::default().run(&cmd).await.unwrap();
        assert!(outcome.success());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "one\ntwo\n");
    }

    #[tokio::test]
    async fn test_missing_shell_is_an_error() {
        let err = ShellRunner::new("/nonexistent/sh").run("true").await.unwrap_err();
        assert!(err.to_string().contains("Failed to spawn"));
    }
}
