//! HTTP client for model providers.
//!
//! One POST per generation, no retry and no client-side timeout: a failed
//! call surfaces immediately and the user decides whether to regenerate.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::ProviderError;
use crate::provider::Provider;

/// A text-completion collaborator. Behind a trait so the pipeline can be
/// exercised with a scripted fake.
#[async_trait]
pub trait Completion {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError>;
}

/// Real provider client over reqwest.
pub struct ModelClient {
    provider: Provider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ModelClient {
    /// Build a client, resolving the API key from the provider's
    /// environment variable.
    pub fn new(provider: Provider, model: &str) -> Result<Self, ProviderError> {
        let api_key = resolve_api_key(provider)?;
        Ok(Self {
            provider,
            model: model.to_string(),
            endpoint: provider.default_endpoint().to_string(),
            api_key,
            http: reqwest::Client::new(),
        })
    }

    /// Build a client with an explicit key (e.g. from an interactive prompt).
    pub fn with_api_key(provider: Provider, model: &str, api_key: String) -> Self {
        Self {
            provider,
            model: model.to_string(),
            endpoint: provider.default_endpoint().to_string(),
            api_key: Some(api_key),
            http: reqwest::Client::new(),
        }
    }

    /// Override the endpoint (tests and self-hosted deployments).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }
}

/// Resolve the API key for a provider from its environment variable.
///
/// Returns `Ok(None)` for providers that need no key (ollama).
pub fn resolve_api_key(provider: Provider) -> Result<Option<String>, ProviderError> {
    let Some(env_var) = provider.api_key_env_var() else {
        return Ok(None);
    };

    match std::env::var(env_var) {
        Ok(key) if !key.is_empty() => Ok(Some(key)),
        _ => Err(ProviderError::MissingApiKey {
            provider: provider.as_str().to_string(),
            env_var: env_var.to_string(),
        }),
    }
}

#[async_trait]
impl Completion for ModelClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let body = self.provider.build_request(&self.model, system, user);
        debug!(
            "POST {} (provider={}, model={})",
            self.endpoint, self.provider, self.model
        );

        let mut request = self.http.post(&self.endpoint).json(&body);
        match (self.provider, &self.api_key) {
            (Provider::Anthropic, Some(key)) => {
                request = request
                    .header("x-api-key", key)
                    .header("anthropic-version", "2023-06-01");
            }
            (_, Some(key)) => {
                request = request.bearer_auth(key);
            }
            (_, None) => {}
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e, self.provider.as_str().to_string()))?;

        let status = response.status();
        let response_body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e, self.provider.as_str().to_string()))?;

        if !status.is_success() {
            let detail = self
                .provider
                .parse_error_detail(&response_body)
                .unwrap_or_else(|| response_body.to_string().chars().take(200).collect());
            return Err(ProviderError::ApiError {
                provider: self.provider.as_str().to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        self.provider.parse_response(&response_body)
    }
}
