//! Solve a random Euclidean instance and print the run statistics.
//!
//! ```text
//! cargo run --release --example random_points -- --points 500 --strategy parallel-two-opt
//! ```

use christofides_tsp::config::{Config, Neighbourhood, OptimizationStrategy};
use christofides_tsp::graph::Node;
use christofides_tsp::utils::{format_duration, init_logger};
use christofides_tsp::TspSolver;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    None,
    TwoOpt,
    ThreeOpt,
    AnnealingTwoOpt,
    AnnealingThreeOpt,
    ParallelTwoOpt,
    ParallelThreeOpt,
    ThreeOptThenParallel,
}

impl From<Strategy> for OptimizationStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::None => OptimizationStrategy::None,
            Strategy::TwoOpt => OptimizationStrategy::TwoOpt,
            Strategy::ThreeOpt => OptimizationStrategy::ThreeOpt,
            Strategy::AnnealingTwoOpt => OptimizationStrategy::AnnealingTwoOpt,
            Strategy::AnnealingThreeOpt => OptimizationStrategy::AnnealingThreeOpt,
            Strategy::ParallelTwoOpt => OptimizationStrategy::ParallelAnnealing {
                neighbourhood: Neighbourhood::TwoOpt,
            },
            Strategy::ParallelThreeOpt => OptimizationStrategy::ParallelAnnealing {
                neighbourhood: Neighbourhood::ThreeOpt,
            },
            Strategy::ThreeOptThenParallel => OptimizationStrategy::ThreeOptThenParallelTwoOpt,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Solve a random Euclidean TSP instance", long_about = None)]
struct Cli {
    /// Number of random points
    #[arg(short, long, default_value_t = 200)]
    points: usize,

    /// Seed for point generation and the solver
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Refinement strategy, ignored when --config is given
    #[arg(long, value_enum, default_value_t = Strategy::ThreeOpt)]
    strategy: Strategy,

    /// JSON solver configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let config = match &cli.config {
        Some(path) => {
            println!("Loading configuration from: {}", path.display());
            Config::from_json(&fs::read_to_string(path)?)?
        }
        None => Config::new()
            .with_strategy(cli.strategy.into())
            .with_seed(cli.seed),
    };

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let nodes: Vec<_> = (0..cli.points)
        .map(|i| Node::shared(i, (rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0))))
        .collect();

    println!("Building distance cache for {} points", cli.points);
    let solver = TspSolver::from_nodes(
        nodes,
        |a: &Node<usize, (f64, f64)>, b: &Node<usize, (f64, f64)>| {
            let (x1, y1): (f64, f64) = *a.value();
            let (x2, y2): (f64, f64) = *b.value();
            ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
        },
        config,
    )?;

    println!("Starting search (strategy: {:?})", solver.config().strategy);
    let start_time = Instant::now();
    let solution = solver.solve()?;
    let runtime = start_time.elapsed();

    println!("Search completed in {}", format_duration(runtime));
    println!("{}", solution.statistics.format());

    Ok(())
}
