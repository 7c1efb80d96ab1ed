//! Prompt building utilities for model requests.
//!
//! The request is always the same shape: a fixed system instruction, the
//! user's natural-language request, and deterministic decoding so the same
//! phrase keeps producing the same command.

use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};

/// System prompt that pins the model to a single bare command.
pub const SYSTEM_PROMPT: &str = "You convert natural language into valid Linux shell commands. \
Respond ONLY with the command, nothing else.";

/// Upper bound on generated tokens. A single command line never needs more.
pub const MAX_TOKENS: u32 = 128;

/// Greedy decoding.
pub const TEMPERATURE: f32 = 0.0;

/// Build the `[system, user]` message pair for a request.
pub fn build_messages(user_request: &str) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
    let system_msg = ChatCompletionRequestSystemMessageArgs::default()
        .content(SYSTEM_PROMPT)
        .build()?
        .into();
    let user_msg = ChatCompletionRequestUserMessageArgs::default()
        .content(user_request)
        .build()?
        .into();

    Ok(vec![system_msg, user_msg])
}

/// Build the full chat completion request for `model`.
#[allow(deprecated)]
pub fn build_request(
    model: &str,
    user_request: &str,
) -> Result<CreateChatCompletionRequest, OpenAIError> {
    CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(build_messages(user_request)?)
        .max_tokens(MAX_TOKENS)
        .temperature(TEMPERATURE)
        .build()
}
