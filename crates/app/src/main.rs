use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use corpus_embed_core::{
    embedder_for_model, run_extraction, run_generation, validate_pagination, LopdfExtractor,
    PipelineConfig, RunLock,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "corpus-embed", version)]
struct Cli {
    /// Pipeline configuration file (JSON).
    #[arg(long, env = "CORPUS_EMBED_CONFIG", default_value = "corpus.json")]
    config: PathBuf,

    /// Lock file guarding against concurrent runs over the same artifacts.
    #[arg(long, default_value = "corpus-embed.lock")]
    lock_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract every volume page into the intermediate text artifact.
    Extract,
    /// Embed the intermediate artifact into the final vector artifact.
    Embed,
    /// Run extraction and embedding back to back.
    Run,
    /// Check declared volume offsets against actual physical page counts.
    Validate,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::from_file(&cli.config)
        .with_context(|| format!("cannot load configuration from {}", cli.config.display()))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        model = %config.model,
        "corpus-embed boot"
    );

    match cli.command {
        Command::Extract => {
            let _lock = RunLock::acquire(&cli.lock_file)?;
            extract(&config)?;
        }
        Command::Embed => {
            let _lock = RunLock::acquire(&cli.lock_file)?;
            embed(&config)?;
        }
        Command::Run => {
            let _lock = RunLock::acquire(&cli.lock_file)?;
            extract(&config)?;
            embed(&config)?;
        }
        Command::Validate => validate(&config)?,
    }

    Ok(())
}

fn extract(config: &PipelineConfig) -> anyhow::Result<()> {
    let report = run_extraction(config, &LopdfExtractor)?;

    for path in &report.missing {
        warn!(path = %path.display(), "declared volume was not found");
    }

    println!(
        "{} pages extracted from {} volume(s) to {}",
        report.records.len(),
        report.volumes.len(),
        config.intermediate_path.display()
    );
    Ok(())
}

fn embed(config: &PipelineConfig) -> anyhow::Result<()> {
    let embedder = embedder_for_model(&config.model)?;
    let report = run_generation(config, embedder.as_ref())?;

    println!(
        "{} pages embedded ({} empty pages skipped, {} dimensions) to {}",
        report.embedded,
        report.skipped_empty,
        report.dimensions,
        config.final_path.display()
    );
    Ok(())
}

fn validate(config: &PipelineConfig) -> anyhow::Result<()> {
    let issues = validate_pagination(&config.volumes, &LopdfExtractor)?;

    if issues.is_empty() {
        println!("volume pagination is consistent");
        return Ok(());
    }

    for issue in &issues {
        println!("pagination issue: {issue}");
    }
    anyhow::bail!("{} pagination issue(s) found", issues.len());
}
