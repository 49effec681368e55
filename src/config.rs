//! Configuration parameters for tour construction and refinement.

use crate::error::{Result, TspError};
use crate::parallel::MAX_PARALLELISM;
use serde::{Deserialize, Serialize};

/// Move family used by annealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighbourhood {
    TwoOpt,
    ThreeOpt,
}

/// Refinement applied to the Christofides tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizationStrategy {
    /// Keep the constructed tour as is
    None,
    /// Exhaustive 2-opt until no improving move remains
    TwoOpt,
    /// Exhaustive reduced 3-opt until no improving move remains
    ThreeOpt,
    AnnealingTwoOpt,
    AnnealingThreeOpt,
    /// Independent annealing runs on a thread pool, best result kept
    ParallelAnnealing { neighbourhood: Neighbourhood },
    /// 3-opt annealing followed by parallel 2-opt annealing
    ThreeOptThenParallelTwoOpt,
}

impl Default for OptimizationStrategy {
    fn default() -> Self {
        OptimizationStrategy::ThreeOpt
    }
}

/// Temperature schedule for simulated annealing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingParams {
    /// Starting temperature
    pub initial_temperature: f64,
    /// Fraction of the temperature removed after every outer iteration
    pub cooling_rate: f64,
    /// Maximum number of outer iterations (temperature steps)
    pub max_iterations: usize,
    /// Moves tried at the first temperature
    pub equilibrium_count: usize,
    /// Growth of the per-temperature move count after each step
    pub equilibrium_increase: usize,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        AnnealingParams {
            initial_temperature: 1.0,
            cooling_rate: 0.001,
            max_iterations: 26_000,
            equilibrium_count: 20,
            equilibrium_increase: 1,
        }
    }
}

impl AnnealingParams {
    /// Create a new schedule with default values.
    pub fn new() -> Self {
        AnnealingParams::default()
    }

    /// Set the starting temperature.
    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    /// Set the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Set the maximum number of temperature steps.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the number of moves tried at the first temperature.
    pub fn with_equilibrium_count(mut self, count: usize) -> Self {
        self.equilibrium_count = count;
        self
    }

    /// Set the per-step growth of the move count.
    pub fn with_equilibrium_increase(mut self, increase: usize) -> Self {
        self.equilibrium_increase = increase;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature > 0.0) {
            return Err(TspError::invalid_config(format!(
                "initial temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(TspError::invalid_config(format!(
                "cooling rate must lie in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.equilibrium_count == 0 {
            return Err(TspError::invalid_config("equilibrium count must be at least 1"));
        }
        Ok(())
    }
}

/// Configuration settings for the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Refinement applied after construction
    pub strategy: OptimizationStrategy,
    /// Annealing schedule shared by every annealing strategy
    pub annealing: AnnealingParams,
    /// Number of parallel annealing runs, clamped to [`MAX_PARALLELISM`]
    pub parallelism: usize,
    /// Pairwise-exchange sweeps run on the greedy matching
    pub matching_improvement_iterations: usize,
    /// Shortcut the Eulerian circuit from a random position
    pub randomized_start: bool,
    /// Base seed; parallel worker `i` uses `seed + i`
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strategy: OptimizationStrategy::default(),
            annealing: AnnealingParams::default(),
            parallelism: 12,
            matching_improvement_iterations: 2,
            randomized_start: false,
            seed: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the optimisation strategy.
    pub fn with_strategy(mut self, strategy: OptimizationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the annealing schedule.
    pub fn with_annealing(mut self, annealing: AnnealingParams) -> Self {
        self.annealing = annealing;
        self
    }

    /// Set the number of parallel annealing runs.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Set the number of matching improvement sweeps.
    pub fn with_matching_improvement_iterations(mut self, iterations: usize) -> Self {
        self.matching_improvement_iterations = iterations;
        self
    }

    /// Enable or disable the randomised shortcut start.
    pub fn with_randomized_start(mut self, randomized: bool) -> Self {
        self.randomized_start = randomized;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of worker threads actually used for parallel annealing.
    pub fn effective_parallelism(&self) -> usize {
        self.parallelism.min(MAX_PARALLELISM)
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if self.parallelism == 0 {
            return Err(TspError::invalid_config("parallelism must be at least 1"));
        }
        self.annealing.validate()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
