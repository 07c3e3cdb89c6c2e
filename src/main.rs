//! Command-line driver: loads or builds a network, trains it, prints results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tanh_mlp::{
    evaluate, train_loop, Dataset, Network, NetworkOptions, NetworkSpec, Topology, TrainConfig,
    UpdateRule,
};

#[derive(Parser)]
#[command(name = "tanh-mlp")]
#[command(about = "Train a small tanh multilayer perceptron", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Level {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Train a network described by a spec file on a JSON dataset
    Train {
        /// Path to the network spec (name, topology, options)
        #[arg(short, long)]
        spec: PathBuf,

        /// Path to the dataset ({"samples": [{"input": [..], "target": [..]}]})
        #[arg(short, long)]
        data: PathBuf,

        /// Optional training config file; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of training epochs
        #[arg(short, long)]
        epochs: Option<usize>,

        /// Stop once an epoch's mean error is below this
        #[arg(short, long)]
        target_error: Option<f64>,

        /// Seed for weight initialization and shuffling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Learn XOR with a built-in 2-4-1 network
    Xor {
        /// Number of training epochs
        #[arg(short, long, default_value = "3000")]
        epochs: usize,

        /// Seed for weight initialization and shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Weight update rule
        #[arg(short, long, value_enum, default_value = "accumulate")]
        rule: Rule,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Rule {
    Replace,
    Accumulate,
}

impl From<Rule> for UpdateRule {
    fn from(rule: Rule) -> UpdateRule {
        match rule {
            Rule::Replace => UpdateRule::Replace,
            Rule::Accumulate => UpdateRule::Accumulate,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train { spec, data, config, epochs, target_error, seed } => {
            let spec = NetworkSpec::load_json(&spec)
                .with_context(|| format!("loading network spec {}", spec.display()))?;
            let dataset = Dataset::load_json(&data)
                .with_context(|| format!("loading dataset {}", data.display()))?;

            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => TrainConfig::default(),
            };
            if let Some(epochs) = epochs {
                config.epochs = epochs;
            }
            if target_error.is_some() {
                config.target_error = target_error;
            }
            if seed.is_some() {
                config.seed = seed;
            }

            let mut rng = config.rng();
            info!(name = %spec.name, topology = ?spec.topology.layers(), "building network");
            let mut network = spec.build_with_rng(&mut rng);
            run(&mut network, &dataset, &config, &mut rng)
        }
        Commands::Xor { epochs, seed, rule } => {
            let topology = Topology::new(vec![2, 4, 1])?;
            let mut options = NetworkOptions::default();
            options.optimizer.rule = rule.into();

            let config = TrainConfig { epochs, seed, ..TrainConfig::default() };
            let mut rng = config.rng();
            let mut network = Network::build_with_rng(topology, &options, &mut rng);
            run(&mut network, &Dataset::xor(), &config, &mut rng)
        }
    }
}

fn load_config(path: &Path) -> Result<TrainConfig> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening training config {}", path.display()))?;
    let config: TrainConfig = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parsing training config {}", path.display()))?;
    Ok(config)
}

fn run(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
    rng: &mut rand::rngs::StdRng,
) -> Result<()> {
    let history = train_loop(network, dataset, config, rng)?;
    if let Some(last) = history.last() {
        println!(
            "Epoch {}/{}: error = {:.6}, recent average = {:.6}",
            last.epoch, last.total_epochs, last.mean_error, last.recent_average_error
        );
    }

    for sample in &dataset.samples {
        network.feed_forward(&sample.input)?;
        println!(
            "Input: {:?} -> Output: {:?} (target {:?})",
            sample.input,
            network.get_results(),
            sample.target
        );
    }
    println!("Mean error: {:.6}", evaluate(network, dataset)?);

    Ok(())
}
