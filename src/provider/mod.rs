//! Model provider dispatch.
//!
//! Each provider is a variant of [`Provider`], carrying its endpoint,
//! request shape, response shape, and auth scheme as methods. Adding a
//! provider means adding a variant, not threading branches through the
//! client.

pub mod client;

pub use client::{Completion, ModelClient};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ProviderError;

/// Supported model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Ollama => "ollama",
        }
    }

    /// Environment variable holding the API key, if the provider needs one.
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Ollama => None,
        }
    }

    /// Default completion endpoint.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1/chat/completions",
            Provider::Anthropic => "https://api.anthropic.com/v1/messages",
            Provider::Ollama => "http://localhost:11434/api/chat",
        }
    }

    /// Build the provider-specific request body.
    pub fn build_request(&self, model: &str, system: &str, user: &str) -> Value {
        match self {
            Provider::OpenAi => json!({
                "model": model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": user},
                ],
                "temperature": 0.2,
            }),
            Provider::Anthropic => json!({
                "model": model,
                "max_tokens": 1024,
                "system": system,
                "messages": [
                    {"role": "user", "content": user},
                ],
                "temperature": 0.2,
            }),
            Provider::Ollama => json!({
                "model": model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": user},
                ],
                "stream": false,
            }),
        }
    }

    /// Extract the completion text from the provider-specific response body.
    pub fn parse_response(&self, body: &Value) -> Result<String, ProviderError> {
        let text = match self {
            Provider::OpenAi => body
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str),
            Provider::Anthropic => body.pointer("/content/0/text").and_then(Value::as_str),
            Provider::Ollama => body.pointer("/message/content").and_then(Value::as_str),
        };

        match text {
            Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
            Some(_) => Err(ProviderError::EmptyCompletion(self.as_str().to_string())),
            None => Err(ProviderError::MalformedResponse {
                provider: self.as_str().to_string(),
                detail: format!("missing completion field in: {}", truncate_body(body)),
            }),
        }
    }

    /// Extract a human-readable detail from a provider error body, if any.
    pub fn parse_error_detail(&self, body: &Value) -> Option<String> {
        body.pointer("/error/message")
            .and_then(Value::as_str)
            .map(|s| s.to_string())
    }
}

fn truncate_body(body: &Value) -> String {
    let text = body.to_string();
    text.chars().take(200).collect()
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "ollama" => Ok(Provider::Ollama),
            _ => Err(ProviderError::UnknownProvider(s.to_string())),
        }
    }
}
