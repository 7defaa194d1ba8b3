//! Swasthya Mitra - offline symptom triage from the command line.
//!
//! Prints the diagnosis record and the presentation hand-off as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use swasthya_lib::config::{self, ClassifierConfig};
use swasthya_lib::triage::{TriageRequest, TriageService, TriageState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Language code of the user (en, hi, kn, hi-IN, ...)
    #[arg(short, long, default_value = "en", global = true)]
    lang: String,

    /// Report the device as online (enables hospital lookup hand-off)
    #[arg(long, global = true)]
    online: bool,

    /// Print compact instead of pretty JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match typed or transcribed symptom text
    Diagnose {
        /// Symptom description
        #[arg(required = true)]
        text: Vec<String>,

        /// Symptom database (defaults to $SWASTHYA_SYMPTOMS or ~/SwasthyaMitra/symptoms.json)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
    /// Classify a skin photo (PNG, JPEG or TIFF)
    Classify {
        image: PathBuf,

        /// Color-sampling fast path instead of the full pipeline
        #[arg(long)]
        fast: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    swasthya_lib::init_tracing();

    let (request, state) = match args.command {
        Command::Diagnose { text, database } => {
            let path = database.unwrap_or_else(config::symptom_database_path);
            let state = Arc::new(TriageState::default());
            state.load_database(&path).await;
            let request = TriageRequest::from_parts(Some(&text.join(" ")), &args.lang, None)
                .context("Symptom text is empty")?;
            (request, state)
        }
        Command::Classify { image, fast } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("Failed to read image {}", image.display()))?;
            let config = if fast {
                ClassifierConfig::fast()
            } else {
                ClassifierConfig::default()
            };
            let request = TriageRequest::from_parts(None, &args.lang, Some(bytes))
                .context("No image supplied")?;
            (request, Arc::new(TriageState::new(config)))
        }
    };

    let service = TriageService::new(state);
    let outcome = service.assess_and_plan(request, args.online).await;
    info!(
        issue = %outcome.record.issue,
        severity = %outcome.record.severity,
        generic = outcome.record.is_generic,
        "Assessment complete"
    );

    let json = if args.compact {
        serde_json::to_string(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome)?
    };
    println!("{json}");

    Ok(())
}
