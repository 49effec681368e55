//! Independent annealing runs on a bounded thread pool.
//!
//! Each worker owns a copy of the starting tour and its own seeded random
//! source; the distance cache is shared read-only. Workers are joined before
//! any result is returned, and a panicking worker propagates out of the join.

use crate::config::{AnnealingParams, Neighbourhood};
use crate::distance::DistanceCache;
use crate::error::{Result, TspError};
use crate::graph::NodeKey;
use crate::local_search::{anneal, AnnealingMove, ThreeOpt, TwoOpt};
use crate::tour::Tour;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Hard cap on concurrently running annealing workers.
pub const MAX_PARALLELISM: usize = 14;

/// Result of one annealing worker.
#[derive(Debug, Clone)]
pub struct WorkerResult {
    /// Worker index, also the offset added to the base seed
    pub worker: usize,
    pub tour: Tour,
    pub elapsed: Duration,
}

/// Fans annealing runs out over a thread pool.
pub struct ParallelAnnealing<'a, K, V> {
    cache: &'a DistanceCache<K, V>,
    params: AnnealingParams,
    parallelism: usize,
    seed: u64,
}

impl<'a, K: NodeKey, V: Send + Sync> ParallelAnnealing<'a, K, V> {
    /// Create a new coordinator. `parallelism` is clamped to
    /// `1..=MAX_PARALLELISM`.
    ///
    /// Fails with `MissingDistance` on an incomplete cache.
    pub fn new(
        cache: &'a DistanceCache<K, V>,
        params: AnnealingParams,
        parallelism: usize,
        seed: u64,
    ) -> Result<Self> {
        cache.ensure_complete()?;
        Ok(ParallelAnnealing {
            cache,
            params,
            parallelism: parallelism.clamp(1, MAX_PARALLELISM),
            seed,
        })
    }

    /// Number of workers a run starts.
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Run every worker from `tour` and return all results in worker order.
    pub fn run_all(
        &self,
        tour: &Tour,
        neighbourhood: Neighbourhood,
    ) -> Result<Vec<WorkerResult>> {
        match neighbourhood {
            Neighbourhood::TwoOpt => self.run_all_with(&TwoOpt::new(self.cache)?, tour),
            Neighbourhood::ThreeOpt => self.run_all_with(&ThreeOpt::new(self.cache)?, tour),
        }
    }

    /// Run every worker from `tour` and overwrite it with the lightest result.
    ///
    /// Returns the new weight.
    pub fn run_best(&self, tour: &mut Tour, neighbourhood: Neighbourhood) -> Result<f64> {
        let results = self.run_all(tour, neighbourhood)?;
        let best = results
            .into_iter()
            .min_by(|a, b| a.tour.weight.total_cmp(&b.tour.weight))
            .ok_or_else(|| TspError::ThreadPool("no worker produced a result".to_string()))?;

        log::info!(
            "parallel annealing: best worker {} with weight {:.4}",
            best.worker,
            best.tour.weight
        );
        *tour = best.tour;
        Ok(tour.weight)
    }

    /// Run every worker with a caller-supplied neighbourhood.
    pub fn run_all_with<M: AnnealingMove>(
        &self,
        neighbourhood: &M,
        tour: &Tour,
    ) -> Result<Vec<WorkerResult>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallelism)
            .build()
            .map_err(|e| TspError::ThreadPool(format!("rayon pool: {e}")))?;

        log::info!(
            "parallel annealing: start workers={} seed={} weight={:.4}",
            self.parallelism,
            self.seed,
            tour.weight
        );

        let results: Vec<WorkerResult> = pool.install(|| {
            (0..self.parallelism)
                .into_par_iter()
                .map(|worker| {
                    let started = Instant::now();
                    let seed = self.seed.wrapping_add(worker as u64);
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    let mut own = tour.clone();

                    anneal(neighbourhood, &mut own, &self.params, &mut rng);
                    own.recompute_weight(self.cache);

                    log::debug!("worker {worker}: done weight={:.4}", own.weight);
                    WorkerResult {
                        worker,
                        tour: own,
                        elapsed: started.elapsed(),
                    }
                })
                .collect()
        });

        Ok(results)
    }
}
