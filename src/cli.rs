//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::ai::download::DEFAULT_CATALOG_URL;

#[derive(Parser, Debug)]
#[command(
    name = "shellgen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Turn a natural-language request into a shell command using a local model",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// What you want to do, e.g. "find files larger than 1GB". Read from stdin when piped.
    #[arg(value_name = "TEXT", trailing_var_arg = true)]
    pub text: Vec<String>,

    /// Run the generated command without asking
    #[arg(short = 'y', long = "no-confirm", conflicts_with = "print")]
    pub no_confirm: bool,

    /// Only print the generated command on stdout
    #[arg(long)]
    pub print: bool,

    /// Configuration file to use
    #[arg(long, env = "SHELLGEN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Model file to use for this run instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub model: Option<String>,

    /// Base URL of the catalog missing models are downloaded from
    #[arg(long, env = "SHELLGEN_CATALOG_URL", default_value = DEFAULT_CATALOG_URL, hide = true)]
    pub catalog_url: String,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Choose a model and write the configuration file
    Setup,
}

/// How a generated command is handled after it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Ask `[Y/n]` before running
    Confirm,
    /// Run without asking
    NoConfirm,
    /// Print the command and stop
    PrintOnly,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.print {
            Mode::PrintOnly
        } else if self.no_confirm {
            Mode::NoConfirm
        } else {
            Mode::Confirm
        }
    }
}
