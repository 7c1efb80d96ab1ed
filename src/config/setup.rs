//! Interactive first-run setup: pick a model and record it in `config.ini`.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;
use tracing::{debug, info};

use super::Config;

/// A model offered by the setup menu.
#[derive(Debug, Clone, Copy)]
pub struct ModelChoice {
    pub file_name: &'static str,
    pub description: &'static str,
    pub recommended: bool,
}

pub static MODELS: [ModelChoice; 5] = [
    ModelChoice {
        file_name: "Meta-Llama-3-8B-Instruct.Q4_0.gguf",
        description: "Meta-Llama-3-8B-Instruct (8B / 4.66GB / 8GB RAM required / Llama 3 License)",
        recommended: false,
    },
    ModelChoice {
        file_name: "Nous-Hermes-2-Mistral-7B-DPO.Q4_0.gguf",
        description: "Nous-Hermes-2-Mistral-7B-DPO (7B / 4.11GB / 8GB RAM / Apache 2.0)",
        recommended: false,
    },
    ModelChoice {
        file_name: "Phi-3-mini-4k-instruct.Q4_0.gguf",
        description: "Phi-3-mini-4k-instruct (3.8B / 2.18GB / 4GB RAM / MIT)",
        recommended: true,
    },
    ModelChoice {
        file_name: "orca-mini-3b-gguf2-q4_0.gguf",
        description: "orca-mini-3b (3B / 1.98GB / CC-BY-NC-SA-4.0)",
        recommended: false,
    },
    ModelChoice {
        file_name: "gpt4all-13b-snoozy-q4_0.gguf",
        description: "GPT4All-13b-snoozy (13B / 7.37GB / 16GB RAM required)",
        recommended: false,
    },
];

/// Map a menu answer (exactly `"1"`..`"5"`) to a model.
pub fn parse_choice(answer: &str) -> Option<&'static ModelChoice> {
    let answer = answer.trim();
    MODELS
        .iter()
        .enumerate()
        .find(|(i, _)| (i + 1).to_string() == answer)
        .map(|(_, model)| model)
}

/// Run the wizard, write the config to `path` and return it.
///
/// Keeps asking until a valid number is entered. Running out of input
/// aborts setup without touching the file. Only `model` is replaced in a
/// readable existing config; its other keys are kept.
pub fn run<R: BufRead, W: Write>(input: &mut R, output: &mut W, path: &Path) -> Result<Config> {
    writeln!(output, "\n{}", "ShellGen Initial Setup".cyan())?;
    writeln!(output, "Select a model to use:\n")?;
    writeln!(output, "{}", "Model Options:".yellow())?;
    for (i, model) in MODELS.iter().enumerate() {
        let marker = if model.recommended { " (recommended)" } else { "" };
        writeln!(
            output,
            "{} {}{}",
            format!("{}.", i + 1).green(),
            model.description,
            marker
        )?;
    }
    writeln!(output)?;

    let choice = loop {
        write!(output, "{}", format!("Enter model number (1-{}): ", MODELS.len()).yellow())?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            bail!("Setup aborted: no model selected");
        }
        if let Some(choice) = parse_choice(&answer) {
            break choice;
        }
    };

    let config = match Config::load(path) {
        Ok(existing) => Config {
            model: choice.file_name.to_string(),
            ..existing
        },
        Err(e) => {
            debug!(error = %e, "writing a fresh configuration");
            Config::new(choice.file_name)
        }
    };
    config.save(path)?;
    info!(model = choice.file_name, path = %path.display(), "configuration saved");

    writeln!(
        output,
        "\n{} {}",
        "Saved configuration to".green(),
        path.display()
    )?;
    writeln!(output, "Selected model: {}\n", choice.file_name.cyan())?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_choice() {
        assert_eq!(
            parse_choice("3").map(|m| m.file_name),
            Some("Phi-3-mini-4k-instruct.Q4_0.gguf")
        );
        assert_eq!(
            parse_choice(" 5\n").map(|m| m.file_name),
            Some("gpt4all-13b-snoozy-q4_0.gguf")
        );
        assert!(parse_choice("0").is_none());
        assert!(parse_choice("6").is_none());
        assert!(parse_choice("-1").is_none());
        assert!(parse_choice("phi").is_none());
        assert!(parse_choice("+3").is_none());
        assert!(parse_choice("03").is_none());
        assert!(parse_choice("").is_none());
    }

    #[test]
    fn test_only_one_recommended_model() {
        assert_eq!(MODELS.iter().filter(|m| m.recommended).count(), 1);
        assert!(MODELS.iter().all(|m| m.file_name.ends_with(".gguf")));
    }

    #[test]
    fn test_run_reprompts_until_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let mut input = Cursor::new(b"abc\n9\n\n2\n".to_vec());
        let mut output = Vec::new();

        let config = run(&mut input, &mut output, &path).unwrap();
        assert_eq!(config.model, "Nous-Hermes-2-Mistral-7B-DPO.Q4_0.gguf");
        assert_eq!(Config::load(&path).unwrap(), config);

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Enter model number").count(), 4);
        assert!(printed.contains("Selected model:"));
    }

    #[test]
    fn test_run_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(
            &path,
            "[shellgen]\nmodel = a.gguf\nendpoint = http://127.0.0.1:8080/v1\nthreads = 8\n",
        )
        .unwrap();
        let mut input = Cursor::new(b"3\n".to_vec());
        let mut output = Vec::new();

        run(&mut input, &mut output, &path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.model, "Phi-3-mini-4k-instruct.Q4_0.gguf");
        assert_eq!(reloaded.endpoint.as_deref(), Some("http://127.0.0.1:8080/v1"));
        assert_eq!(reloaded.threads, 8);
    }

    #[test]
    fn test_run_replaces_corrupt_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[other]\nkey = value\n").unwrap();
        let mut input = Cursor::new(b"1\n".to_vec());
        let mut output = Vec::new();

        let config = run(&mut input, &mut output, &path).unwrap();
        assert_eq!(config, Config::new("Meta-Llama-3-8B-Instruct.Q4_0.gguf"));
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_run_aborts_on_eof() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let mut input = Cursor::new(b"7\n".to_vec());
        let mut output = Vec::new();

        let err = run(&mut input, &mut output, &path).unwrap_err();
        assert!(err.to_string().contains("no model selected"));
        assert!(!path.exists());
    }
}
