use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use triage::{
    default_artifact_name, ArtifactStore, PipelineConfig, PredictionService, Table,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding pipeline artifacts (defaults to the platform cache)
    #[arg(long, global = true)]
    artifacts_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a pipeline from a labeled CSV corpus and save the artifact
    Train {
        /// Path to the labeled training CSV
        #[arg(short, long)]
        data: PathBuf,
        /// Optional JSON configuration overriding the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Artifact name to save under
        #[arg(long)]
        name: Option<String>,
    },
    /// Predict labels for a JSON batch read from a file or stdin
    Predict {
        /// Path to a JSON array of records; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Artifact name to load
        #[arg(long)]
        name: Option<String>,
    },
    /// Print a loaded artifact's version, labels, and vocabulary size
    Inspect {
        /// Artifact name to load
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = match &args.artifacts_dir {
        Some(dir) => ArtifactStore::new(dir)?,
        None => ArtifactStore::new_default()?,
    };

    match args.command {
        Command::Train { data, config, name } => train(&store, &data, config.as_deref(), name),
        Command::Predict { input, name } => predict(&store, input.as_deref(), name),
        Command::Inspect { name } => inspect(&store, name),
    }
}

fn train(
    store: &ArtifactStore,
    data: &std::path::Path,
    config: Option<&std::path::Path>,
    name: Option<String>,
) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    let table = Table::from_csv_path(data)
        .with_context(|| format!("loading training data from {}", data.display()))?;
    info!("loaded {} training rows", table.len());

    let report = triage::run_training(&table, &config)?;
    println!("{}", serde_json::to_string_pretty(&report.metrics)?);

    let name = name.unwrap_or_else(default_artifact_name);
    store.save(&name, &report.artifact)?;
    println!("saved artifact '{}'", name);
    Ok(())
}

fn predict(
    store: &ArtifactStore,
    input: Option<&std::path::Path>,
    name: Option<String>,
) -> anyhow::Result<()> {
    let name = name.unwrap_or_else(default_artifact_name);
    let artifact = store
        .load(&name)
        .with_context(|| format!("loading artifact '{}'", name))?;
    let service = PredictionService::new(Arc::new(artifact));

    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading batch from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let batch: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("batch must be a JSON array of records")?;

    let response = service.predict(&batch)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn inspect(store: &ArtifactStore, name: Option<String>) -> anyhow::Result<()> {
    let name = name.unwrap_or_else(default_artifact_name);
    let artifact = store
        .load(&name)
        .with_context(|| format!("loading artifact '{}'", name))?;

    println!("artifact:        {}", name);
    println!("version:         {}", artifact.version());
    println!("labels:          {}", artifact.classes().join(", "));
    println!("vocabulary size: {}", artifact.vocabulary_size());
    Ok(())
}
