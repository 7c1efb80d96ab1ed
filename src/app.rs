//! The request pipeline.
//!
//! read input → load config → ensure model → start runtime → generate →
//! show and classify → confirm → execute.
//!
//! [`App`] owns the part after the model is available. It is generic over
//! where commands come from, how they run, and where the user's answers are
//! read from, so the confirmation gate can be exercised without a model or
//! a terminal.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use tracing::{info, warn};

use crate::ai::download::{download_model, model_url};
use crate::ai::{AiClient, CommandSource, LocalRuntime};
use crate::cli::{Cli, Commands, Mode};
use crate::config::{self, Config, setup};
use crate::security::{
    CommandSafety, Confirmation, ExecutionDecision, analyze_command, gate_command,
    parse_confirmation,
};
use crate::shell::{CommandRunner, RunOutcome, ShellRunner};

/// Where the confirmation answer comes from when stdin is not a terminal.
const CONTROLLING_TERMINAL: &str = "/dev/tty";

/// What happened to a generated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Printed,
    Cancelled,
    Executed(RunOutcome),
}

impl Outcome {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Outcome::Executed(run) => ExitCode::from(run.exit_code()),
            Outcome::Printed | Outcome::Cancelled => ExitCode::SUCCESS,
        }
    }
}

pub struct App<S, R, I, W> {
    source: S,
    runner: R,
    /// `None` when no terminal is available to ask the user
    input: Option<I>,
    output: W,
    mode: Mode,
}

impl<S, R, I, W> App<S, R, I, W>
where
    S: CommandSource,
    R: CommandRunner,
    I: BufRead,
    W: Write,
{
    pub fn new(source: S, runner: R, input: Option<I>, output: W, mode: Mode) -> Self {
        Self {
            source,
            runner,
            input,
            output,
            mode,
        }
    }

    /// Ask the model for a command.
    pub async fn generate(&self, request: &str) -> Result<String> {
        self.source.generate(request).await
    }

    /// Show, classify, confirm and possibly run an already generated command.
    pub async fn handle_command(&mut self, request: &str, command: &str) -> Result<Outcome> {
        if self.mode == Mode::PrintOnly {
            writeln!(self.output, "{}", command)?;
            return Ok(Outcome::Printed);
        }

        writeln!(self.output, "\n{} {}", "Input:".cyan(), request)?;
        writeln!(self.output, "{} {}\n", "Command:".green(), command)?;

        let safety = analyze_command(command);
        if let CommandSafety::Warn(verbs) = &safety {
            warn!(command, verbs = ?verbs, "destructive command");
            writeln!(
                self.output,
                "{}\n",
                "WARNING: command modifies system files.".red()
            )?;
        }

        let confirmation = match self.mode {
            Mode::NoConfirm => Confirmation::Confirmed,
            _ => self.ask_confirmation()?,
        };

        match gate_command(command, confirmation) {
            ExecutionDecision::Execute => {
                writeln!(self.output, "{}\n", "Executing...".green())?;
                self.output.flush()?;

                let run = self.runner.run(command).await?;
                if !run.success() {
                    writeln!(self.output, "{}", format!("Command {}", run).red())?;
                }
                Ok(Outcome::Executed(run))
            }
            ExecutionDecision::Cancel { reason } => {
                info!(%reason, "command not executed");
                writeln!(self.output, "{}", "Cancelled.".blue())?;
                Ok(Outcome::Cancelled)
            }
        }
    }

    /// Generate a command and handle it in one go.
    pub async fn run_request(&mut self, request: &str) -> Result<Outcome> {
        let command = self.generate(request).await?;
        self.handle_command(request, &command).await
    }

    /// Prompt `[Y/n]`. No terminal or end of input counts as "no".
    fn ask_confirmation(&mut self) -> Result<Confirmation> {
        let Some(input) = self.input.as_mut() else {
            writeln!(
                self.output,
                "{}",
                "No terminal available to confirm the command.".red()
            )?;
            return Ok(Confirmation::Declined);
        };

        write!(self.output, "{} ", "Run this command? [Y/n]".yellow())?;
        self.output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(self.output)?;
            return Ok(Confirmation::Declined);
        }
        Ok(parse_confirmation(&answer))
    }
}

/// Pick the request text: piped stdin wins, arguments are used when it is empty.
pub fn resolve_request(args: &[String], piped: Option<String>) -> Option<String> {
    let text = match piped {
        Some(text) if !text.trim().is_empty() => text,
        _ => args.join(" "),
    };

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn print_usage<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "{} shellgen <text>", "Usage:".yellow())?;
    writeln!(output, "   or: echo 'text' | shellgen")
}

/// Reader for interactive answers: stdin if it is a terminal, else the controlling terminal.
fn terminal_input(stdin_is_tty: bool) -> Option<Box<dyn BufRead>> {
    if stdin_is_tty {
        return Some(Box::new(io::stdin().lock()));
    }
    match File::open(CONTROLLING_TERMINAL) {
        Ok(tty) => Some(Box::new(BufReader::new(tty))),
        Err(e) => {
            info!(error = %e, "no controlling terminal");
            None
        }
    }
}

/// Make sure the model file exists, downloading it from the catalog if needed.
async fn ensure_model<W: Write>(
    model_path: &Path,
    file_name: &str,
    catalog_url: &str,
    output: &mut W,
) -> Result<()> {
    if model_path.exists() {
        return Ok(());
    }

    writeln!(output, "{} {}", "Model not found:".red(), model_path.display())?;
    writeln!(output, "{}", format!("Downloading model {} ...", file_name).yellow())?;
    output.flush()?;

    let http = reqwest::Client::new();
    download_model(&http, &model_url(catalog_url, file_name), model_path)
        .await
        .with_context(|| format!("Failed to download model {}", file_name))?;

    writeln!(output, "{} {}", "Model downloaded:".green(), model_path.display())?;
    Ok(())
}

/// Entry point behind `main`: wires the real model, shell and terminal together.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let stdin_is_tty = io::stdin().is_terminal();
    let mode = cli.mode();

    // Keep stdout clean for the command itself in print mode.
    let mut ui: Box<dyn Write> = match mode {
        Mode::PrintOnly => Box::new(io::stderr()),
        _ => Box::new(io::stdout()),
    };

    if cli.command == Some(Commands::Setup) {
        let mut input = terminal_input(stdin_is_tty)
            .context("Setup needs an interactive terminal")?;
        setup::run(&mut input, &mut ui, &config_path)?;
        return Ok(ExitCode::SUCCESS);
    }

    let piped = if stdin_is_tty {
        None
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        Some(buf)
    };
    let Some(request) = resolve_request(&cli.text, piped) else {
        print_usage(&mut ui)?;
        return Ok(ExitCode::from(1));
    };
    info!(%request, "received request");

    let mut input = terminal_input(stdin_is_tty);
    let mut config = match input.as_mut() {
        Some(input) => config::load_or_setup(&config_path, input, &mut ui)?,
        None => Config::load(&config_path)?,
    };
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }

    let (client, runtime) = match &config.endpoint {
        Some(endpoint) => {
            info!(%endpoint, "using configured endpoint");
            (AiClient::new(endpoint.as_str(), config.model.as_str()), None)
        }
        None => {
            let model_path = config.model_path(&config::models_dir(&config_path));
            ensure_model(&model_path, &config.model, &cli.catalog_url, &mut ui).await?;

            let runtime = LocalRuntime::start(&config.runtime_config(model_path))
                .await
                .context("Failed to load model")?;
            (
                AiClient::new(runtime.api_base(), config.model.as_str()),
                Some(runtime),
            )
        }
    };

    let output: Box<dyn Write> = match mode {
        Mode::PrintOnly => Box::new(io::stdout()),
        _ => ui,
    };
    let mut app = App::new(client, ShellRunner::default(), input, output, mode);

    let command = app.generate(&request).await;
    // The model is not needed while the user's command runs.
    if let Some(runtime) = runtime {
        runtime.shutdown().await?;
    }
    let outcome = app.handle_command(&request, &command?).await?;

    Ok(outcome.exit_code())
}
