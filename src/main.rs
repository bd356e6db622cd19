use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use sigcombo::config::ConfigManager;
use sigcombo::data::{load_explanations, ProblemFile};
use sigcombo::engines::evaluation::top_signals;
use sigcombo::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use sigcombo::types::{BooleanSequence, Distance, SignalScore};

#[derive(Parser, Debug)]
#[command(
    name = "sigcombo",
    about = "Evolve AND/OR combinations of binary signals toward a target sequence"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for the expression closest to the problem's target
    Explore(ExploreArgs),
    /// Write the default configuration as TOML
    InitConfig {
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
}

#[derive(Parser, Debug)]
struct ExploreArgs {
    /// JSON file with `vectors` and `target`
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    problem: PathBuf,

    /// TOML configuration; SIGCOMBO_* variables override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    generations: Option<usize>,

    #[arg(long = "pop-size")]
    pop_size: Option<usize>,

    #[arg(long = "max-depth")]
    max_depth: Option<usize>,

    #[arg(long = "max-elements")]
    max_elements: Option<usize>,

    /// How many single signals to rank against the target
    #[arg(long = "top-n", default_value_t = 5)]
    top_n: usize,

    /// Build offspring in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// JSON object of signal name -> explanation
    #[arg(long, value_name = "FILE")]
    explanations: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchReport {
    expression: String,
    result_sequence: BooleanSequence,
    hamming_distance: Distance,
    signals: Vec<String>,
    top_signals: Vec<SignalScore>,
    explanations: BTreeMap<String, Value>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Explore(args) => run_explore(args),
        Commands::InitConfig { output } => {
            ConfigManager::new()
                .save_to_file(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            log::info!("Wrote default configuration to {}", output.display());
            Ok(())
        }
    }
}

fn run_explore(args: ExploreArgs) -> Result<()> {
    let manager = ConfigManager::new();
    manager
        .load(args.config.as_deref())
        .context("failed to load configuration")?;
    manager.update(|config| {
        let search = &mut config.search;
        if let Some(seed) = args.seed {
            search.seed = Some(seed);
        }
        if let Some(generations) = args.generations {
            search.generations = generations;
        }
        if let Some(pop_size) = args.pop_size {
            search.pop_size = pop_size;
        }
        if let Some(max_depth) = args.max_depth {
            search.max_depth = max_depth;
        }
        if let Some(max_elements) = args.max_elements {
            search.max_elements = Some(max_elements);
        }
        if args.parallel {
            search.parallel = true;
        }
    })?;
    let config = manager.get()?;

    let registry = ProblemFile::from_path(&args.problem)
        .and_then(ProblemFile::into_registry)
        .with_context(|| format!("failed to load problem {}", args.problem.display()))?;

    let registry = Arc::new(registry);
    let top = top_signals(&registry, args.top_n);

    let mut engine = EvolutionEngine::new(Arc::clone(&registry), config.search)?;
    let outcome = engine.run(ConsoleProgressCallback)?;

    let explanations = match &args.explanations {
        Some(path) => {
            let catalog = load_explanations(path)
                .with_context(|| format!("failed to load explanations {}", path.display()))?;
            top.iter()
                .map(|score| &score.name)
                .chain(&outcome.signals)
                .filter_map(|name| catalog.get(name).map(|v| (name.clone(), v.clone())))
                .collect()
        }
        None => BTreeMap::new(),
    };

    let report = SearchReport {
        expression: outcome.expression,
        result_sequence: outcome.result_sequence,
        hamming_distance: outcome.hamming_distance,
        signals: outcome.signals,
        top_signals: top,
        explanations,
    };
    let json = serde_json::to_string_pretty(&report)?;

    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(())
}
