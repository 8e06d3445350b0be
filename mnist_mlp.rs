use backprop_mlp::architecture::{build_network, load_architecture, ArchitectureConfig};
use backprop_mlp::config::{load_config, validate_config, TrainingConfig};
use backprop_mlp::data::{Dataset, NUM_CLASSES};
use backprop_mlp::utils::SimpleRng;
use backprop_mlp::{Evaluation, NetworkError};
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};

// Dense MNIST classifier trained one sample at a time (784 -> 64 -> 10 by default).

/// Command line arguments. Flags override values from `--config`.
#[derive(Parser, Debug)]
#[command(author, version, about = "Train and evaluate a dense MNIST classifier", long_about = None)]
struct Args {
    /// Training configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Architecture description (JSON)
    #[arg(short, long)]
    architecture: Option<PathBuf>,

    /// Directory containing the four MNIST IDX files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Seed for weight initialization
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    epochs: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    /// Log per-layer details
    #[arg(short, long)]
    verbose: bool,
}

/// What a run produced, printed as the final summary.
#[derive(Debug)]
struct RunSummary {
    epoch_losses: Vec<f64>,
    evaluation: Evaluation,
    load_time: f64,
    train_time: f64,
    test_time: f64,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Merges the optional JSON config with command line overrides.
fn resolve_config(args: &Args) -> Result<TrainingConfig, NetworkError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => TrainingConfig::default(),
    };

    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learning_rate = learning_rate;
    }

    validate_config(&config)?;
    Ok(config)
}

fn resolve_architecture(args: &Args) -> Result<ArchitectureConfig, NetworkError> {
    match &args.architecture {
        Some(path) => load_architecture(path),
        None => Ok(ArchitectureConfig::mnist_default()),
    }
}

/// Loads both splits, builds the network, trains it and evaluates it.
fn run(config: &TrainingConfig, architecture: &ArchitectureConfig) -> Result<RunSummary, NetworkError> {
    info!("Loading data from {}...", config.data_dir.display());
    let load_start = Instant::now();
    let train_set = Dataset::load(
        config.train_images(),
        config.train_labels(),
        NUM_CLASSES,
        config.missing_data,
    )?;
    let test_set = Dataset::load(
        config.test_images(),
        config.test_labels(),
        NUM_CLASSES,
        config.missing_data,
    )?;
    let load_time = load_start.elapsed().as_secs_f64();

    info!("Initializing neural network...");
    let mut rng = match config.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_time(),
    };
    let mut nn = build_network(architecture, config.weight_init, &mut rng)?;
    if nn.output_size() != NUM_CLASSES {
        return Err(NetworkError::Config(format!(
            "output layer has {} neurons, MNIST needs {}",
            nn.output_size(),
            NUM_CLASSES
        )));
    }
    for dataset in [&train_set, &test_set] {
        if let Some(features) = dataset.feature_len() {
            if features != nn.input_size() {
                return Err(NetworkError::ShapeMismatch {
                    context: "image size",
                    expected: nn.input_size(),
                    actual: features,
                });
            }
        }
    }
    info!(
        "{} parameters, learning rate {}, {} epochs",
        nn.parameter_count(),
        config.learning_rate,
        config.epochs
    );

    info!("Training neural network...");
    let train_start = Instant::now();
    let epoch_losses = nn.train(
        &train_set.inputs,
        &train_set.targets,
        config.learning_rate,
        config.epochs,
    )?;
    let train_time = train_start.elapsed().as_secs_f64();

    info!("Testing neural network...");
    let test_start = Instant::now();
    let evaluation = nn.test(&test_set.inputs, &test_set.targets)?;
    let test_time = test_start.elapsed().as_secs_f64();

    Ok(RunSummary {
        epoch_losses,
        evaluation,
        load_time,
        train_time,
        test_time,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let program_start = Instant::now();
    let config = resolve_config(&args)?;
    let architecture = resolve_architecture(&args)?;
    let summary = run(&config, &architecture)?;

    println!("\n=== Performance Summary ===");
    if let Some(loss) = summary.epoch_losses.last() {
        println!("Final training loss: {:.6}", loss);
    }
    match summary.evaluation.accuracy() {
        Some(accuracy) => println!("Test accuracy: {:.2}%", accuracy * 100.0),
        None => println!("Test accuracy: n/a (no test samples)"),
    }
    println!("Data loading time: {:.2} seconds", summary.load_time);
    println!("Total training time: {:.2} seconds", summary.train_time);
    println!("Testing time: {:.2} seconds", summary.test_time);
    println!(
        "Total program time: {:.2} seconds",
        program_start.elapsed().as_secs_f64()
    );
    println!("========================");
    Ok(())
}
