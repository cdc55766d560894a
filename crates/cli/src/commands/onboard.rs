//! `stylecast onboard`: first-time setup.

use std::path::Path;
use stylecast_config::AppConfig;

pub async fn run(config_override: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));

    println!("✍️  Stylecast: First-Time Setup");
    println!("==============================\n");

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        } else {
            println!("  Config directory exists: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    // Directories for the profile and the training corpus
    let config = AppConfig::load_at(&config_path)?;
    if let Some(dir) = config.profile.path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    if !config.profile.training_dir.exists() {
        std::fs::create_dir_all(&config.profile.training_dir)?;
        println!(
            "✅ Created training directory: {}",
            config.profile.training_dir.display()
        );
    }

    println!("\n📝 Next steps:");
    println!("   1. Add your API key to {} (or set STYLECAST_API_KEY)", config_path.display());
    println!("   2. Run: stylecast train --file <your-writing.md>");
    println!("   3. Run: stylecast chat\n");

    Ok(())
}
