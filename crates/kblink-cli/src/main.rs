//! kblink CLI - Command-line interface
//!
//! Usage:
//!   kblink resolve --index names.json --facts facts.json <mention> <question tokens...>
//!   kblink lookup --index names.json <name>

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use kblink_core::{AppConfig, FactStore, NameIndex};
use kblink_linker::EntityLinker;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kblink")]
#[command(about = "Knowledge-base entity linking CLI")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (env vars are used otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a mention against the knowledge base
    Resolve {
        /// Path to the JSON name index
        #[arg(long)]
        index: PathBuf,

        /// Path to the JSON fact store
        #[arg(long)]
        facts: PathBuf,

        /// Entity mention extracted from the question
        mention: String,

        /// Question tokens, in order
        #[arg(trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Print the raw candidates stored for a surface form
    Lookup {
        /// Path to the JSON name index
        #[arg(long)]
        index: PathBuf,

        /// Surface form to look up
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    match cli.command {
        Commands::Resolve {
            index,
            facts,
            mention,
            question,
        } => {
            let index = Arc::new(NameIndex::from_json_file(&index)?);
            let facts = Arc::new(FactStore::from_json_file(&facts)?);
            debug!(names = index.len(), entities = facts.len(), "knowledge base loaded");

            let linker = EntityLinker::new(index, facts, config.linker);
            let resolution = linker.resolve(&mention, &question)?;

            let output = serde_json::json!({
                "facts": resolution.facts,
                "confidences": resolution.confidences,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Lookup { index, name } => {
            let index = NameIndex::from_json_file(&index)?;
            match index.get(&name) {
                Some(candidates) => println!("{}", serde_json::to_string_pretty(candidates)?),
                None => println!("no candidates for {name:?}"),
            }
        }
    }

    Ok(())
}
