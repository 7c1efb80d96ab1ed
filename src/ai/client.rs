use anyhow::{Context, Result, anyhow};
use async_openai::{Client, config::OpenAIConfig};
use tracing::{debug, info};

use super::{parser, prompt};

/// Local runtimes ignore the key, but the client always sends one.
const LOCAL_API_KEY: &str = "sk-no-key-required";

/// Anything that can turn a natural-language request into a command line.
#[allow(async_fn_in_trait)]
pub trait CommandSource {
    /// Return a sanitized, non-empty command for `user_request`.
    async fn generate(&self, user_request: &str) -> Result<String>;
}

/// Chat client bound to an OpenAI-compatible endpoint serving the local model.
pub struct AiClient {
    client: Client<OpenAIConfig>,
    pub model: String,
}

impl AiClient {
    /// `api_base` is the `/v1` root, e.g. `http://127.0.0.1:8080/v1`.
    pub fn new(api_base: impl Into<String>, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(LOCAL_API_KEY);
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    /// Send the request and return the raw text of the first choice.
    pub async fn complete(&self, user_request: &str) -> Result<String> {
        let request = prompt::build_request(&self.model, user_request)
            .context("Failed to build chat completion request")?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("Chat completion request failed")?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        debug!(reply = %reply, "model reply");

        Ok(reply)
    }
}

impl CommandSource for AiClient {
    async fn generate(&self, user_request: &str) -> Result<String> {
        let reply = self.complete(user_request).await?;
        let command = parser::extract_command(&reply)
            .ok_or_else(|| anyhow!("model returned no command"))?;
        info!(command = %command, "generated command");
        Ok(command)
    }
}
