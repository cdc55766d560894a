//! `stylecast profile`: inspect or edit the style profile.

use std::path::Path;
use stylecast_core::profile::StyleProfile;
use stylecast_profile::{ProfileStore, TrainingCorpus};

pub async fn show(config_path: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let store = ProfileStore::from_config(&config.profile);
    let profile = store.snapshot().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile, store.path());
    }
    Ok(())
}

pub async fn set_tone(config_path: Option<&Path>, tone: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let store = ProfileStore::from_config(&config.profile);
    store.set_tone(tone).await.into_result()?;
    println!("✅ Tone updated");
    Ok(())
}

pub async fn set_voice(config_path: Option<&Path>, voice: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let store = ProfileStore::from_config(&config.profile);
    store.set_voice(voice).await.into_result()?;
    println!("✅ Voice updated");
    Ok(())
}

pub async fn corpus(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let corpus = TrainingCorpus::new(&config.profile.training_dir);
    let records = corpus.list();

    println!("📚 Training corpus: {} record(s) in {}", records.len(), corpus.dir().display());
    for record in &records {
        let preview: String = record.content.chars().take(60).collect();
        println!(
            "  {} [{}] w={:.2}{} {}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.source,
            record.weight,
            record
                .edition
                .as_deref()
                .map(|e| format!(" ed={e}"))
                .unwrap_or_default(),
            preview.replace('\n', " ")
        );
    }
    Ok(())
}

fn print_profile(profile: &StyleProfile, path: &Path) {
    println!("✍️  Style Profile ({})", path.display());
    println!("====================");
    println!("  Tone:     {}", profile.tone);
    println!("  Voice:    {}", profile.voice);
    println!(
        "  Training: {} call(s), average weight {:.3}",
        profile.training_count, profile.average_weight
    );
    println!("  Updated:  {}", profile.last_updated.format("%Y-%m-%d %H:%M:%S UTC"));

    print_list("Themes", &profile.themes);
    print_list("Phrases", &profile.phrases);
    print_list("Expertise", &profile.expertise_areas);

    if !profile.writing_patterns.is_empty() {
        println!("\n  Writing patterns:");
        for (aspect, pattern) in &profile.writing_patterns {
            println!("    {aspect}: {pattern}");
        }
    }

    if !profile.primitives.is_empty() {
        println!("\n  Primitives:");
        for (topic, primitive) in &profile.primitives {
            println!("    [{topic}] {}", primitive.core_principle);
            if !primitive.key_frameworks.is_empty() {
                println!("      frameworks: {}", primitive.key_frameworks.join(", "));
            }
        }
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n  {title}:");
    for item in items {
        println!("    - {item}");
    }
}
