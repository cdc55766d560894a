//! Stylecast CLI: the main entry point.
//!
//! Commands:
//! - `onboard`    Initialize config and data directories
//! - `train`      Learn from one or more pieces of writing
//! - `chat`       Answer in the learned style (single message or interactive)
//! - `rewrite`    Restyle a text in the learned voice
//! - `classify`   Show keyword topic scores for a message
//! - `profile`    Inspect or edit the style profile
//! - `primitive`  Set a per-topic primitive
//! - `gateway`    Start the HTTP API server
//! - `doctor`     Diagnose configuration and profile health

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "stylecast",
    about = "Stylecast: learn a writing style and answer in it",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Use this config file instead of ~/.stylecast/config.toml
    #[arg(long, global = true, env = "STYLECAST_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and data directories
    Onboard,

    /// Train the style profile on writing samples
    Train {
        /// Files to learn from
        #[arg(short, long = "file", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Source label (defaults to the file name)
        #[arg(short, long)]
        source: Option<String>,

        /// Influence weight in [0, 1]; overrides inline markers
        #[arg(short, long)]
        weight: Option<f64>,

        /// Edition or issue label; overrides inline markers
        #[arg(short, long)]
        edition: Option<String>,
    },

    /// Chat in the learned style
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Rewrite a text in the learned voice
    Rewrite {
        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// The text to rewrite
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Show which topic a message would be routed to
    Classify {
        /// The message to classify
        text: String,
    },

    /// Inspect or edit the style profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Manage per-topic primitives
    Primitive {
        #[command(subcommand)]
        action: PrimitiveAction,
    },

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Diagnose configuration and profile health
    Doctor,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the profile
    Show {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the tone description
    Tone { tone: String },
    /// Replace the voice description
    Voice { voice: String },
    /// List saved training records
    Corpus,
}

#[derive(Subcommand)]
enum PrimitiveAction {
    /// Replace the primitive for a topic
    Set {
        /// One of the built-in topics (strategy, marketing, ...)
        topic: String,

        #[arg(long)]
        principle: String,

        /// Repeat for several frameworks
        #[arg(long = "framework")]
        frameworks: Vec<String>,

        #[arg(long, default_value = "")]
        pattern: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Onboard => commands::onboard::run(config).await?,
        Commands::Train {
            files,
            source,
            weight,
            edition,
        } => commands::train::run(config, files, source, weight, edition).await?,
        Commands::Chat { message } => commands::chat::run(config, message).await?,
        Commands::Rewrite { file, text } => commands::rewrite::run(config, file, text).await?,
        Commands::Classify { text } => commands::classify::run(&text),
        Commands::Profile { action } => match action {
            ProfileAction::Show { json } => commands::profile::show(config, json).await?,
            ProfileAction::Tone { tone } => commands::profile::set_tone(config, tone).await?,
            ProfileAction::Voice { voice } => commands::profile::set_voice(config, voice).await?,
            ProfileAction::Corpus => commands::profile::corpus(config).await?,
        },
        Commands::Primitive { action } => match action {
            PrimitiveAction::Set {
                topic,
                principle,
                frameworks,
                pattern,
            } => commands::primitive::set(config, &topic, principle, frameworks, pattern).await?,
        },
        Commands::Gateway { port } => commands::gateway::run(config, port).await?,
        Commands::Doctor => commands::doctor::run(config).await?,
    }

    Ok(())
}
