//! Solver orchestrating construction and the configured refinement.

use crate::christofides::euler::tour_graph_from_order;
use crate::christofides::{Christofides, Construction};
use crate::config::{Config, Neighbourhood, OptimizationStrategy};
use crate::distance::DistanceCache;
use crate::error::{Result, TspError};
use crate::graph::{EdgeCreator, Graph, Node, NodeKey, NodeRef, PlainEdgeCreator};
use crate::local_search::{ThreeOpt, TwoOpt};
use crate::parallel::ParallelAnnealing;
use crate::solution::Solution;
use crate::tour::Tour;
use crate::utils::RunStatistics;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Smallest instance that forms a cycle.
pub const MIN_NODES: usize = 3;

/// One worker's result from [`TspSolver::benchmark`].
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    pub worker: usize,
    pub tour: Tour,
    pub statistics: RunStatistics,
}

/// Christofides construction followed by one refinement strategy.
///
/// The complete graph and distance cache are built once and only read
/// afterwards; every run derives fresh graphs from them.
pub struct TspSolver<K, V> {
    graph: Graph<K, V>,
    cache: DistanceCache<K, V>,
    config: Config,
    seed: u64,
}

impl<K: NodeKey, V: Send + Sync + 'static> TspSolver<K, V> {
    /// Create a solver over a complete graph and its distance cache.
    ///
    /// Fails if the configuration is invalid, if the cache misses any pair, if
    /// a graph node is unknown to the cache, or if there are fewer than three
    /// nodes.
    pub fn new(graph: Graph<K, V>, cache: DistanceCache<K, V>, config: Config) -> Result<Self> {
        config.validate()?;
        cache.ensure_complete()?;

        if graph.size() < MIN_NODES {
            return Err(TspError::TooFewNodes {
                required: MIN_NODES,
                actual: graph.size(),
            });
        }
        if let Some(node) = graph.nodes().find(|node| cache.slot(node.key()).is_none()) {
            return Err(TspError::UnknownNode(format!("{:?}", node.key())));
        }

        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        log::info!(
            "solver: n={} strategy={:?} seed={}",
            graph.size(),
            config.strategy,
            seed
        );

        Ok(TspSolver {
            graph,
            cache,
            config,
            seed,
        })
    }

    /// Create a solver over the complete graph of a distance cache.
    pub fn from_cache(cache: DistanceCache<K, V>, config: Config) -> Result<Self> {
        Self::with_creator(cache, Arc::new(PlainEdgeCreator), config)
    }

    /// Like [`from_cache`](Self::from_cache), with a custom edge creator.
    pub fn with_creator(
        cache: DistanceCache<K, V>,
        creator: Arc<dyn EdgeCreator<K, V>>,
        config: Config,
    ) -> Result<Self> {
        cache.ensure_complete()?;
        let graph = Graph::complete(&cache, creator)?;
        Self::new(graph, cache, config)
    }

    /// Register `nodes`, fill the cache with `distance` and build the solver.
    pub fn from_nodes<I, F>(nodes: I, distance: F, config: Config) -> Result<Self>
    where
        I: IntoIterator<Item = NodeRef<K, V>>,
        F: Fn(&Node<K, V>, &Node<K, V>) -> f64,
    {
        Self::from_cache(DistanceCache::complete(nodes, distance), config)
    }

    pub fn graph(&self) -> &Graph<K, V> {
        &self.graph
    }

    pub fn cache(&self) -> &DistanceCache<K, V> {
        &self.cache
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Base seed every random draw of a run derives from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the Christofides construction.
    pub fn construct<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Construction<K, V>> {
        Christofides::new(&self.graph, &self.cache)
            .with_matching_improvement_iterations(self.config.matching_improvement_iterations)
            .construct(self.config.randomized_start, rng)
    }

    /// Refine `tour` in place with the configured strategy. Returns the new
    /// weight.
    pub fn optimize<R: Rng + ?Sized>(&self, tour: &mut Tour, rng: &mut R) -> Result<f64> {
        let params = &self.config.annealing;

        match self.config.strategy {
            OptimizationStrategy::None => {}
            OptimizationStrategy::TwoOpt => {
                TwoOpt::new(&self.cache)?.perform(tour);
            }
            OptimizationStrategy::ThreeOpt => {
                ThreeOpt::new(&self.cache)?.perform(tour);
            }
            OptimizationStrategy::AnnealingTwoOpt => {
                TwoOpt::new(&self.cache)?.run_simulated_annealing(tour, params, rng);
            }
            OptimizationStrategy::AnnealingThreeOpt => {
                ThreeOpt::new(&self.cache)?.run_simulated_annealing(tour, params, rng);
            }
            OptimizationStrategy::ParallelAnnealing { neighbourhood } => {
                self.parallel()?.run_best(tour, neighbourhood)?;
            }
            OptimizationStrategy::ThreeOptThenParallelTwoOpt => {
                ThreeOpt::new(&self.cache)?.run_simulated_annealing(tour, params, rng);
                self.parallel()?.run_best(tour, Neighbourhood::TwoOpt)?;
            }
        }

        log::info!(
            "{:?} finished with weight {:.4}",
            self.config.strategy,
            tour.weight
        );
        Ok(tour.weight)
    }

    /// Construct a tour and refine it.
    pub fn solve(&self) -> Result<Solution<K, V>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let started = Instant::now();
        let construction = self.construct(&mut rng)?;
        let construction_time = started.elapsed();

        let mut tour = construction.tour.clone();
        let started = Instant::now();
        self.optimize(&mut tour, &mut rng)?;
        let optimization_time = started.elapsed();

        let nodes = tour.nodes(&self.cache);
        let creator = Arc::clone(self.graph.creator());
        let tour_graph = tour_graph_from_order(&nodes, &self.cache, creator)?;
        let statistics =
            self.statistics(&construction, &tour, construction_time, optimization_time);
        log::info!(
            "solve: done weight={:.4} ratio={:.4}",
            tour.weight,
            statistics.mst_ratio()
        );

        Ok(Solution {
            tour,
            nodes,
            tour_graph,
            statistics,
        })
    }

    /// Construct once, then return every parallel annealing worker's result
    /// instead of only the best one.
    pub fn benchmark(&self, neighbourhood: Neighbourhood) -> Result<Vec<BenchmarkRun>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let started = Instant::now();
        let construction = self.construct(&mut rng)?;
        let construction_time = started.elapsed();

        let runs = self
            .parallel()?
            .run_all(&construction.tour, neighbourhood)?
            .into_iter()
            .map(|result| BenchmarkRun {
                worker: result.worker,
                statistics: self.statistics(
                    &construction,
                    &result.tour,
                    construction_time,
                    result.elapsed,
                ),
                tour: result.tour,
            })
            .collect();
        Ok(runs)
    }

    fn parallel(&self) -> Result<ParallelAnnealing<'_, K, V>> {
        ParallelAnnealing::new(
            &self.cache,
            self.config.annealing.clone(),
            self.config.effective_parallelism(),
            self.seed,
        )
    }

    fn statistics(
        &self,
        construction: &Construction<K, V>,
        tour: &Tour,
        construction_time: Duration,
        optimization_time: Duration,
    ) -> RunStatistics {
        RunStatistics {
            nodes: self.graph.size(),
            mst_weight: construction.mst_weight,
            odd_nodes: construction.odd_nodes,
            matching_weight: construction.matching_weight,
            construction_weight: construction.tour.weight,
            final_weight: tour.weight,
            construction_time,
            optimization_time,
        }
    }
}
