//! Provider router: selects the correct LLM provider based on config.
//!
//! Handles provider creation and routing requests to the right backend.
//! When the default provider has no usable credential the router registers a
//! `DemoProvider` in its place.

use std::collections::HashMap;
use std::sync::Arc;
use stylecast_config::{AppConfig, CredentialState};
use stylecast_core::provider::Provider;
use tracing::{info, warn};
use crate::anthropic::AnthropicProvider;
use crate::demo::DemoProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Routes LLM requests to the correct provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names.
    pub fn list(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }
}

/// Build one remote provider by name.
fn build_remote(
    name: &str,
    api_key: &str,
    api_url: Option<&str>,
    timeout: std::time::Duration,
) -> Arc<dyn Provider> {
    if name == "anthropic" {
        let mut p = AnthropicProvider::new(api_key, timeout);
        if let Some(url) = api_url {
            p = p.with_base_url(url);
        }
        Arc::new(p)
    } else {
        let base_url = api_url
            .map(String::from)
            .unwrap_or_else(|| default_base_url(name));
        Arc::new(OpenAiCompatProvider::new(name, base_url, api_key, timeout))
    }
}

/// Build providers from configuration.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);
    let timeout = config.request_timeout();

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .as_deref()
            .or(config.api_key.as_deref());
        // Local servers (ollama, vllm) run without a key
        let keyless = is_local(name, provider_config.api_url.as_deref());
        if !keyless && !CredentialState::of(api_key).is_usable() {
            continue;
        }
        router.register(
            name.clone(),
            build_remote(
                name,
                api_key.unwrap_or_default(),
                provider_config.api_url.as_deref(),
                timeout,
            ),
        );
    }

    if router.get(&config.default_provider).is_none() {
        let provider: Arc<dyn Provider> = match config.credential_state() {
            CredentialState::Present => build_remote(
                &config.default_provider,
                config.effective_api_key().unwrap_or_default(),
                None,
                timeout,
            ),
            _ if is_local(&config.default_provider, None) => {
                build_remote(&config.default_provider, "local", None, timeout)
            }
            CredentialState::Placeholder => {
                warn!(provider = %config.default_provider, "API key looks like a placeholder; running in demo mode");
                Arc::new(DemoProvider::new("placeholder API key"))
            }
            CredentialState::Missing => {
                info!(provider = %config.default_provider, "No API key configured; running in demo mode");
                Arc::new(DemoProvider::new("no API key configured"))
            }
        };
        router.register(config.default_provider.clone(), provider);
    }

    router
}

/// The default provider for `config`. A demo stand-in is registered when no
/// usable credential exists, so this never comes back empty.
pub fn default_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    build_from_config(config)
        .default()
        .unwrap_or_else(|| Arc::new(DemoProvider::new("no provider registered")))
}

fn is_local(provider_name: &str, api_url: Option<&str>) -> bool {
    matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
        || api_url.is_some_and(|u| u.contains("localhost") || u.contains("127.0.0.1"))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
