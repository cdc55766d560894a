//! `stylecast rewrite`: restyle a text in the learned voice.

use std::io::Read;
use std::path::{Path, PathBuf};

pub async fn run(
    config_path: Option<&Path>,
    file: Option<PathBuf>,
    text: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = match (file, text) {
        (Some(path), _) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        (None, Some(text)) => text,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let config = super::load_config(config_path)?;
    let service = super::build_service(&config);
    if service.is_demo() {
        super::demo_notice(config_path);
    }

    let reply = service.rewrite(&content).await?;
    println!("{}", reply.text);
    Ok(())
}
