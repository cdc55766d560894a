//! `stylecast primitive`: per-topic primitive management.

use std::path::Path;
use stylecast_core::profile::Primitive;
use stylecast_profile::ProfileStore;

pub async fn set(
    config_path: Option<&Path>,
    topic: &str,
    principle: String,
    frameworks: Vec<String>,
    pattern: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let store = ProfileStore::from_config(&config.profile);

    let primitive = Primitive {
        core_principle: principle,
        key_frameworks: frameworks,
        response_pattern: pattern,
    };
    store.set_primitive(topic, primitive).await?.into_result()?;

    println!("✅ Primitive for '{topic}' saved to {}", store.path().display());
    Ok(())
}
