//! Command-line access to the bridge operations against the configured index.
use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use spotlight_bridge::{
    config, logging,
    processing::{SearchableItemDraft, SpotlightBridge, validate_drafts},
};

#[derive(Parser)]
#[command(
    name = "spotlight-ingest",
    about = "Index or delete searchable items using the configured index"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index the JSON array of items stored in a file.
    Add {
        #[arg(long)]
        input: PathBuf,
    },
    /// Delete records by id.
    DeleteIds {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete every record in the given domains.
    DeleteDomains {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Delete every record.
    DeleteAll,
    /// Print whether indexing is supported.
    Supported,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    config::init_config();
    logging::init_tracing();
    let bridge = SpotlightBridge::from_config(config::get_config())
        .context("failed to initialize bridge")?;

    match cli.command {
        Command::Add { input } => {
            let content = fs::read_to_string(&input)
                .with_context(|| format!("failed to read items at {}", input.display()))?;
            let drafts: Vec<SearchableItemDraft> = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse items at {}", input.display()))?;
            let items = validate_drafts(drafts)?;
            if !bridge.is_supported() {
                eprintln!("indexing unsupported on this host; nothing was indexed");
            }
            let outcome = bridge.add_searchable_items(items).await?;
            println!("{}", serde_json::to_string(&outcome)?);
        }
        Command::DeleteIds { ids } => bridge.delete_identifiers(ids).await?,
        Command::DeleteDomains { domains } => {
            if domains.iter().any(|domain| domain.trim().is_empty()) {
                bail!("domain identifiers must not be blank");
            }
            bridge.delete_domains(domains).await?
        }
        Command::DeleteAll => bridge.delete_all().await?,
        Command::Supported => println!("{}", bridge.is_supported()),
    }

    Ok(())
}
