//! Scenarious fixture inspector
//!
//! Loads one or more scenario files with schema-less handlers, builds the
//! scenario and prints every entity as JSON. Useful for checking how
//! identifiers, aliases and references come out before writing assertions.
//!
//! Usage:
//!   scenarious-inspect fixtures/base.yaml fixtures/extra.yaml --priority genre

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use scenarious::{Scenario, ScenarioConfig, Source};
use scenarious_inspect::{collect_type_names, schemaless_handlers, summarize};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "scenarious-inspect")]
#[command(about = "Build a fixture scenario and print its entities")]
struct Args {
    /// Scenario files (YAML), merged in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML file with reserved field names and load priority
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Types to load first, comma separated (overrides the config file)
    #[arg(short, long, value_delimiter = ',')]
    priority: Vec<String>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => ScenarioConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScenarioConfig::default(),
    };
    debug!("Config: {:?}", config);

    let sources: Vec<Source> = args.files.iter().cloned().map(Source::from).collect();
    let names = collect_type_names(&sources).context("Failed to read scenario files")?;
    info!("Found {} types: {}", names.len(), names.join(", "));

    let mut builder = Scenario::builder()
        .config(config)
        .handlers(schemaless_handlers(&names))
        .sources(sources);
    if !args.priority.is_empty() {
        builder = builder.load_priority(args.priority.clone());
    }
    let scenario = builder.load().context("Failed to build scenario")?;

    let summary = summarize(&scenario);
    info!(
        "Built {} entities across {} types",
        summary.entity_count(),
        summary.types.len()
    );

    let output = if args.compact {
        serde_json::to_string(&summary)?
    } else {
        serde_json::to_string_pretty(&summary)?
    };
    println!("{output}");
    Ok(())
}
