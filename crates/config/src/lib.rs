//! Configuration loading, validation, and management for Stylecast.
//!
//! Loads configuration from `~/.stylecast/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.stylecast/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Timeout for a single remote call, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Style profile storage
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_request_timeout() -> u64 {
    30
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("profile", &self.profile)
            .field("gateway", &self.gateway)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// The style profile JSON document
    #[serde(default = "default_profile_path")]
    pub path: PathBuf,

    /// Directory receiving one JSON file per training call
    #[serde(default = "default_training_dir")]
    pub training_dir: PathBuf,

    /// Maximum length of the themes / phrases / expertise lists
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Weight above which a matching entry is overwritten
    #[serde(default = "default_replace_threshold")]
    pub replace_threshold: f64,
}

fn default_profile_path() -> PathBuf {
    AppConfig::config_dir().join("style_profile.json")
}
fn default_training_dir() -> PathBuf {
    AppConfig::config_dir().join("training")
}
fn default_capacity() -> usize {
    20
}
fn default_replace_threshold() -> f64 {
    0.8
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            path: default_profile_path(),
            training_dir: default_training_dir(),
            capacity: default_capacity(),
            replace_threshold: default_replace_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    42618
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// Whether a usable credential for the remote model is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// No key anywhere
    Missing,
    /// A key is set but is an obvious template value
    Placeholder,
    /// Something that looks like a real key
    Present,
}

impl CredentialState {
    /// Classify a raw key value.
    pub fn of(key: Option<&str>) -> Self {
        match key {
            None => CredentialState::Missing,
            Some(k) if is_placeholder_key(k) => CredentialState::Placeholder,
            Some(_) => CredentialState::Present,
        }
    }

    pub fn is_usable(self) -> bool {
        self == CredentialState::Present
    }
}

/// Recognize template credentials shipped in example files.
pub fn is_placeholder_key(key: &str) -> bool {
    let k = key.trim().to_ascii_lowercase();
    if k.is_empty() || k.contains('<') || k.contains('>') {
        return true;
    }
    const MARKERS: &[&str] = &[
        "your-api-key",
        "your_api_key",
        "your-key",
        "your_key",
        "changeme",
        "change-me",
        "placeholder",
        "replace-me",
        "replace_me",
    ];
    if MARKERS.iter().any(|m| k.contains(m)) {
        return true;
    }
    // "sk-", "sk-...", "sk-xxxx", "xxxxxxxx"
    let body = k.strip_prefix("sk-").unwrap_or(&k);
    body.chars().all(|c| c == 'x' || c == '.' || c == '*')
}

impl AppConfig {
    /// Load configuration from the default path (~/.stylecast/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `STYLECAST_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    /// - `ANTHROPIC_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_at(&Self::config_dir().join("config.toml"))
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) {
        if self.api_key.is_none() {
            self.api_key = std::env::var("STYLECAST_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("STYLECAST_PROVIDER") {
            self.default_provider = provider;
        }

        if let Ok(model) = std::env::var("STYLECAST_MODEL") {
            self.default_model = model;
        }

        if let Ok(path) = std::env::var("STYLECAST_PROFILE") {
            self.profile.path = PathBuf::from(path);
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".stylecast")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        if self.profile.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "profile.capacity must be > 0".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.profile.replace_threshold) {
            return Err(ConfigError::ValidationError(
                "profile.replace_threshold must be between 0.0 and 1.0".into(),
            ));
        }

        Ok(())
    }

    /// The key that will be used for the default provider.
    pub fn effective_api_key(&self) -> Option<&str> {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.api_key.as_deref())
            .or(self.api_key.as_deref())
    }

    /// The model to request from the default provider.
    pub fn effective_model(&self) -> &str {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.default_model.as_deref())
            .unwrap_or(&self.default_model)
    }

    /// Whether the default provider has a usable credential.
    pub fn credential_state(&self) -> CredentialState {
        CredentialState::of(self.effective_api_key())
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout(),
            profile: ProfileConfig::default(),
            gateway: GatewayConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.gateway.port, 42618);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.profile.capacity, 20);
        assert!((config.profile.replace_threshold - 0.8).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.profile.path, config.profile.path);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let mut config = AppConfig::default();
        config.profile.replace_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.default_provider, "openai");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            r#"
default_provider = "anthropic"
request_timeout_secs = 10

[profile]
path = "/var/lib/stylecast/profile.json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(tmp.path()).unwrap();
        assert_eq!(config.default_provider, "anthropic");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(
            config.profile.path,
            PathBuf::from("/var/lib/stylecast/profile.json")
        );
        assert_eq!(config.profile.capacity, 20);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "default_provider = [not toml").unwrap();
        let err = AppConfig::load_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("openai"));
        assert!(toml_str.contains("42618"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-live-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-live-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn placeholder_keys_detected() {
        for key in [
            "",
            "   ",
            "your-api-key-here",
            "YOUR_API_KEY",
            "<openai key>",
            "changeme",
            "sk-",
            " SK- ",
            "sk-...",
            "sk-xxxxxxxx",
            "xxxxxxxxxxxx",
        ] {
            assert!(is_placeholder_key(key), "{key:?} should be a placeholder");
        }
        assert!(!is_placeholder_key("sk-proj-4f9aB2c"));
        assert!(!is_placeholder_key("sk-ant-api03-Zq"));
    }

    #[test]
    fn bare_key_prefix_is_not_a_credential() {
        let config = AppConfig {
            api_key: Some("sk-".into()),
            ..AppConfig::default()
        };
        assert_eq!(config.credential_state(), CredentialState::Placeholder);
        assert!(!config.credential_state().is_usable());
    }

    #[test]
    fn credential_state_prefers_provider_key() {
        let mut config = AppConfig {
            api_key: Some("your-api-key".into()),
            ..AppConfig::default()
        };
        assert_eq!(config.credential_state(), CredentialState::Placeholder);

        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: Some("sk-proj-realish".into()),
                api_url: None,
                default_model: None,
            },
        );
        assert_eq!(config.credential_state(), CredentialState::Present);

        let empty = AppConfig::default();
        assert_eq!(empty.credential_state(), CredentialState::Missing);
        assert!(!empty.credential_state().is_usable());
    }

    #[test]
    fn provider_model_overrides_default_model() {
        let mut config = AppConfig::default();
        assert_eq!(config.effective_model(), "gpt-4o-mini");
        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: None,
                api_url: None,
                default_model: Some("gpt-4o".into()),
            },
        );
        assert_eq!(config.effective_model(), "gpt-4o");
    }
}
