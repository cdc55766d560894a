//! `stylecast doctor`: diagnose configuration and profile health.

use std::path::Path;
use stylecast_config::{AppConfig, CredentialState};
use stylecast_profile::store::read_profile;

pub async fn run(config_override: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Stylecast Doctor: Diagnostics");
    println!("================================\n");

    let mut issues = 0;

    let config_path = config_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults; run `stylecast onboard`");
        issues += 1;
    }

    let config = match AppConfig::load_at(&config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            println!("\n  ⚠️  1 blocking issue; fix the config and re-run.");
            return Ok(());
        }
    };

    println!(
        "  ℹ️  Provider: {} / model: {}",
        config.default_provider,
        config.effective_model()
    );
    match config.credential_state() {
        CredentialState::Present => println!("  ✅ API key configured"),
        CredentialState::Placeholder => {
            println!("  ⚠️  API key looks like a placeholder; chat runs in demo mode");
            issues += 1;
        }
        CredentialState::Missing => {
            println!("  ⚠️  No API key; set STYLECAST_API_KEY or add api_key to config.toml");
            issues += 1;
        }
    }

    let provider = stylecast_providers::router::default_from_config(&config);
    if !provider.is_demo() {
        match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
            Ok(false) => {
                println!("  ⚠️  Provider '{}' did not answer the health check", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider '{}' check failed: {e}", provider.name());
                issues += 1;
            }
        }
    }

    let profile_path = &config.profile.path;
    if profile_path.exists() {
        match read_profile(profile_path) {
            Ok(profile) => println!(
                "  ✅ Profile readable ({} training call(s)): {}",
                profile.training_count,
                profile_path.display()
            ),
            Err(e) => {
                println!("  ❌ Profile unreadable, defaults will be used: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ℹ️  No profile yet; it is created on first use: {}", profile_path.display());
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
