//! Persisted configuration.
//!
//! The configuration lives in `<config dir>/shellgen/config.ini` with a
//! single `[shellgen]` section. Only `model` is required; it is written by
//! the setup wizard and read on every invocation.
//!
//! ```ini
//! [shellgen]
//! model = Phi-3-mini-4k-instruct.Q4_0.gguf
//! ```

pub mod setup;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use crossterm::style::Stylize;
use ini::Ini;
use thiserror::Error;
use tracing::warn;

use crate::ai::RuntimeConfig;

pub const SECTION: &str = "shellgen";
pub const CONFIG_FILE: &str = "config.ini";
pub const MODELS_DIR: &str = "models";

pub const DEFAULT_SERVER: &str = "llama-server";
pub const DEFAULT_THREADS: u32 = 4;
pub const DEFAULT_CONTEXT_SIZE: u32 = 4096;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration file yet
    #[error("configuration file not found: {0}")]
    Missing(PathBuf),

    /// File exists but has no usable `[shellgen]` / `model` entry
    #[error("invalid or corrupt configuration file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A numeric setting is not a positive integer
    #[error("invalid value '{value}' for '{key}' in {path}")]
    Invalid {
        path: PathBuf,
        key: String,
        value: String,
    },

    #[error("failed to access configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `<config dir>/shellgen`, e.g. `~/.config/shellgen` on Linux.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(SECTION))
        .context("Could not determine the user configuration directory")
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Models are kept next to the configuration file that names them.
pub fn models_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(MODELS_DIR)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// GGUF file name inside the models directory
    pub model: String,
    /// Already-running OpenAI-compatible endpoint; skips launching a runtime
    pub endpoint: Option<String>,
    /// llama.cpp server binary
    pub server: String,
    pub threads: u32,
    pub context_size: u32,
}

impl Config {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            endpoint: None,
            server: DEFAULT_SERVER.to_string(),
            threads: DEFAULT_THREADS,
            context_size: DEFAULT_CONTEXT_SIZE,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => ConfigError::Corrupt {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;

        let section = ini.section(Some(SECTION)).ok_or_else(|| ConfigError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("missing [{}] section", SECTION),
        })?;

        let model = section
            .get("model")
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ConfigError::Corrupt {
                path: path.to_path_buf(),
                reason: "missing 'model' key".to_string(),
            })?;

        let number = |key: &str, default: u32| -> Result<u32, ConfigError> {
            match section.get(key).map(str::trim) {
                None => Ok(default),
                Some(raw) => raw
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ConfigError::Invalid {
                        path: path.to_path_buf(),
                        key: key.to_string(),
                        value: raw.to_string(),
                    }),
            }
        };

        Ok(Self {
            model: model.to_string(),
            endpoint: section
                .get("endpoint")
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
            server: section
                .get("server")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_SERVER)
                .to_string(),
            threads: number("threads", DEFAULT_THREADS)?,
            context_size: number("context_size", DEFAULT_CONTEXT_SIZE)?,
        })
    }

    /// Write the configuration, creating the parent directory. Defaults are omitted.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some(SECTION)).set("model", self.model.as_str());
        if let Some(endpoint) = &self.endpoint {
            ini.with_section(Some(SECTION)).set("endpoint", endpoint.as_str());
        }
        if self.server != DEFAULT_SERVER {
            ini.with_section(Some(SECTION)).set("server", self.server.as_str());
        }
        if self.threads != DEFAULT_THREADS {
            ini.with_section(Some(SECTION)).set("threads", self.threads.to_string());
        }
        if self.context_size != DEFAULT_CONTEXT_SIZE {
            ini.with_section(Some(SECTION))
                .set("context_size", self.context_size.to_string());
        }

        ini.write_to_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn model_path(&self, models_dir: &Path) -> PathBuf {
        models_dir.join(&self.model)
    }

    pub fn runtime_config(&self, model_path: PathBuf) -> RuntimeConfig {
        RuntimeConfig {
            server: self.server.clone(),
            model_path,
            threads: self.threads,
            context_size: self.context_size,
        }
    }
}

/// Load the configuration, running the setup wizard when it is missing or unusable.
pub fn load_or_setup<R: BufRead, W: Write>(
    path: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<Config> {
    match Config::load(path) {
        Ok(config) => return Ok(config),
        Err(ConfigError::Missing(_)) => {
            writeln!(output, "{}", "ShellGen not configured. Launching setup...".red())?;
        }
        Err(e @ (ConfigError::Corrupt { .. } | ConfigError::Invalid { .. })) => {
            warn!(error = %e, "unusable configuration, rerunning setup");
            writeln!(
                output,
                "{}",
                "Invalid or corrupt config file. Relaunching setup...".red()
            )?;
        }
        Err(e) => return Err(e.into()),
    }

    setup::run(input, output, path)?;
    Ok(Config::load(path)?)
}
