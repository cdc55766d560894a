pub mod chat;
pub mod classify;
pub mod doctor;
pub mod gateway;
pub mod onboard;
pub mod primitive;
pub mod profile;
pub mod rewrite;
pub mod train;

use std::path::Path;
use stylecast_config::AppConfig;
use stylecast_profile::StyleService;

/// Load config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => AppConfig::load_at(p),
        None => AppConfig::load(),
    };
    Ok(config.map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Build the style service on the configured default provider.
pub fn build_service(config: &AppConfig) -> StyleService {
    let provider = stylecast_providers::router::default_from_config(config);
    StyleService::from_config(config, provider)
}

/// Note printed when answers come from the demo stand-in.
pub fn demo_notice(config_path: Option<&Path>) {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));
    eprintln!("  ⚠️  Demo mode: no usable API key.");
    eprintln!("     Set STYLECAST_API_KEY or add api_key to {}", path.display());
}
