//! `stylecast train`: learn from writing samples.

use std::path::{Path, PathBuf};
use stylecast_profile::TrainingInput;
use tracing::error;

pub async fn run(
    config_path: Option<&Path>,
    files: Vec<PathBuf>,
    source: Option<String>,
    weight: Option<f64>,
    edition: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let service = super::build_service(&config);
    if service.is_demo() {
        super::demo_notice(config_path);
    }

    let mut failures = 0usize;
    for file in &files {
        let content = std::fs::read_to_string(file)
            .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
        let label = source.clone().unwrap_or_else(|| source_label(file));
        let input = build_input(&content, label, weight, edition.clone());

        match service.train(input).await {
            Ok(outcome) => {
                println!(
                    "✅ {} (weight {:.2}) → {} training call(s), average weight {:.3}",
                    file.display(),
                    outcome.weight,
                    outcome.training_count,
                    outcome.average_weight
                );
                if !outcome.persisted {
                    println!("   ⚠️  Profile updated in memory only; check {}", config.profile.path.display());
                }
            }
            Err(e) => {
                error!(file = %file.display(), error = %e, "Training failed");
                println!("❌ {}: {e}", file.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} file(s) failed", files.len()).into());
    }
    Ok(())
}

/// Explicit flags win; otherwise inline markers in the text are honoured.
fn build_input(
    content: &str,
    source: String,
    weight: Option<f64>,
    edition: Option<String>,
) -> TrainingInput {
    let mut input = TrainingInput::from_legacy(content, source);
    if weight.is_some() {
        input.weight = weight;
    }
    if edition.is_some() {
        input.edition = edition;
    }
    input
}

fn source_label(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_markers() {
        let input = build_input("weight: 0.2\nBody.", "x".into(), Some(0.9), None);
        assert_eq!(input.weight, Some(0.9));
        assert_eq!(input.content, "Body.");

        let input = build_input("weight: 0.2\nBody.", "x".into(), None, None);
        assert_eq!(input.weight, Some(0.2));
    }

    #[test]
    fn label_is_file_name() {
        assert_eq!(source_label(Path::new("/tmp/posts/launch.md")), "launch.md");
    }
}
