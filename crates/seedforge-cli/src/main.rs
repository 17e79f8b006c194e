use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use seedforge_analyze::{ModelScanner, ScanOptions};
use seedforge_core::Error as CoreError;
use seedforge_generate::{
    GenerateOptions, GenerationEngine, GenerationError, ReferenceResolver, ResolverOptions,
};
use seedforge_store::{
    InMemoryStoreAdapter, OutputFormat, StorageError, StorageManager, StoreAdapter,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("analysis error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "seedforge", version, about = "Model analysis and data seeding CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List models discovered under the models directory.
    List(ListArgs),
    /// Show the analyzed structure of one model.
    Info(InfoArgs),
    /// Generate synthetic datasets and write them out.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Directory holding the schema source files.
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Model name, matched case-insensitively.
    model: String,
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,
    /// Records per model.
    #[arg(long, default_value_t = 10)]
    count: usize,
    /// Output format: json, mongo or db.
    #[arg(long, default_value = "json")]
    format: String,
    /// Output path; defaults per format for file outputs.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Seed for reproducible runs.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Plain mode: index-derived values instead of realistic ones.
    #[arg(long, default_value_t = false)]
    plain: bool,
    /// Only generate these models (comma separated).
    #[arg(long, value_delimiter = ',')]
    models: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::List(args) => run_list(args),
        Command::Info(args) => run_info(args),
        Command::Generate(args) => run_generate(args).await,
    }
}

fn run_list(args: ListArgs) -> Result<(), CliError> {
    let scanner = ModelScanner::new(ScanOptions::new(args.models_dir));
    let entries = scanner.list_available_models()?;
    if entries.is_empty() {
        println!("no models found");
        return Ok(());
    }
    for entry in entries {
        println!("{}\t{}", entry.name, entry.path.display());
    }
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<(), CliError> {
    let scanner = ModelScanner::new(ScanOptions::new(args.models_dir));
    let info = scanner.get_model_info(&args.model)?;
    println!("{}", serde_json::to_string_pretty(&info.structure)?);
    Ok(())
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let format: OutputFormat = args.format.parse()?;

    let scanner = ModelScanner::new(ScanOptions::new(&args.models_dir));
    let mut structures = scanner.analyze_all()?;
    if !args.models.is_empty() {
        for wanted in &args.models {
            if !structures
                .iter()
                .any(|s| s.name.eq_ignore_ascii_case(wanted))
            {
                return Err(CliError::InvalidConfig(format!("model not found: {wanted}")));
            }
        }
        structures.retain(|structure| {
            args.models
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(&structure.name))
        });
    }

    let options = GenerateOptions {
        count: args.count,
        realistic: !args.plain,
        seed: args.seed,
        ..GenerateOptions::default()
    };
    info!(
        models = structures.len(),
        count = options.count,
        seed = options.seed,
        realistic = options.realistic,
        "generation started"
    );
    let engine = GenerationEngine::new(options);
    let mut resolver = ReferenceResolver::new(ResolverOptions::default());
    let (datasets, report) = engine.generate_all(&structures, &mut resolver).await;

    let manager = StorageManager::new();
    match format {
        OutputFormat::Json => {
            let out = args
                .out
                .unwrap_or_else(|| PathBuf::from("seed-data.json"));
            manager.save_json(&datasets, &out)?;
            println!("wrote {}", out.display());
        }
        OutputFormat::MongoImport => {
            let out = args
                .out
                .unwrap_or_else(|| PathBuf::from("seed-import.js"));
            manager.save_mongo_script(&datasets, &out)?;
            println!("wrote {}", out.display());
        }
        OutputFormat::Db => {
            // No live database wiring yet; the in-memory adapter gives the
            // same registration and batching behavior as a dry run.
            let mut adapter = InMemoryStoreAdapter::new();
            for structure in &structures {
                adapter.register_inferred_model(structure).await?;
            }
            let db_report = manager.save_db(&mut adapter, &datasets).await?;
            println!("{}", serde_json::to_string_pretty(&db_report)?);
        }
    }

    info!(
        synthesized_refs = report.synthesized_references,
        warnings = report.warnings.len(),
        "generation finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
