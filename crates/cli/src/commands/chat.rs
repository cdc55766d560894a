//! `stylecast chat`: single-message or interactive chat in the learned style.

use std::io::{BufRead, Write};
use std::path::Path;
use stylecast_profile::StyleService;

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let service = super::build_service(&config);
    if service.is_demo() {
        super::demo_notice(config_path);
    }

    if let Some(msg) = message {
        reply(&service, &msg).await?;
        return Ok(());
    }

    println!("✍️  Stylecast chat (model: {})", config.effective_model());
    println!("   Type /quit to exit.\n");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "/quit" | "/exit") {
            break;
        }
        // A failed call is reported and the session continues
        if let Err(e) = reply(&service, line).await {
            eprintln!("❌ {e}");
        }
    }

    Ok(())
}

async fn reply(service: &StyleService, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    let reply = service.respond(message).await?;
    println!("{}", reply.text);
    tracing::debug!(topic = %reply.topic, demo = reply.demo, "Reply rendered");
    Ok(())
}
