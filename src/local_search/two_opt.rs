//! 2-opt neighbourhood: remove two tour edges and reconnect by reversing the
//! segment between them.

use super::annealing::{anneal, metropolis_accept};
use super::{AnnealingMove, IMPROVEMENT_EPSILON};
use crate::config::AnnealingParams;
use crate::distance::DistanceCache;
use crate::error::Result;
use crate::graph::NodeKey;
use crate::tour::Tour;
use rand::Rng;

/// 2-opt moves evaluated against a shared distance cache.
#[derive(Debug)]
pub struct TwoOpt<'a, K, V> {
    cache: &'a DistanceCache<K, V>,
}

impl<'a, K, V> Clone for TwoOpt<'a, K, V> {
    fn clone(&self) -> Self {
        TwoOpt { cache: self.cache }
    }
}

impl<'a, K: NodeKey, V> TwoOpt<'a, K, V> {
    /// Create a new 2-opt neighbourhood.
    ///
    /// Fails with `MissingDistance` unless every pair of cached nodes has a
    /// distance.
    pub fn new(cache: &'a DistanceCache<K, V>) -> Result<Self> {
        cache.ensure_complete()?;
        Ok(TwoOpt { cache })
    }
}

impl<'a, K, V> TwoOpt<'a, K, V> {

    /// Every index pair the exhaustive driver tries on a tour of length `n`:
    /// non-adjacent cycle edges `(i, i + 1)` and `(j, j + 1)`.
    pub fn all_segments(n: usize) -> Vec<(usize, usize)> {
        if n < 4 {
            return Vec::new();
        }
        let mut segments = Vec::with_capacity(n * (n - 3) / 2);
        for i in 0..n - 2 {
            for j in (i + 2)..n {
                // Edges (0, 1) and (n - 1, 0) share node 0
                if i == 0 && j == n - 1 {
                    continue;
                }
                segments.push((i, j));
            }
        }
        segments
    }

    /// Weight change of replacing edges `(i, i + 1)` and `(j, j + 1)` with
    /// `(i, j)` and `(i + 1, j + 1)`. `j + 1` wraps to the tour start.
    #[inline]
    pub fn delta(&self, order: &[usize], i: usize, j: usize) -> f64 {
        let n = order.len();
        let (a, b) = (order[i], order[i + 1]);
        let (c, d) = (order[j], order[(j + 1) % n]);

        let removed = self.cache.between(a, b) + self.cache.between(c, d);
        let added = self.cache.between(a, c) + self.cache.between(b, d);
        added - removed
    }

    /// Reverse the segment `i + 1 ..= j`.
    #[inline]
    pub fn apply(order: &mut [usize], i: usize, j: usize) {
        order[i + 1..=j].reverse();
    }

    /// Apply the move `(i, j)` if it strictly shortens the tour.
    ///
    /// Returns the new weight, or `None` when the move was rejected.
    pub fn improve(&self, tour: &mut Tour, i: usize, j: usize) -> Option<f64> {
        let delta = self.delta(&tour.order, i, j);
        if delta < -IMPROVEMENT_EPSILON {
            Self::apply(&mut tour.order, i, j);
            tour.weight += delta;
            Some(tour.weight)
        } else {
            None
        }
    }

    /// Exhaustive 2-opt: full passes over every index pair, applying each
    /// improving move, until a pass changes nothing.
    ///
    /// Returns the total improvement.
    pub fn perform(&self, tour: &mut Tour) -> f64 {
        let segments = Self::all_segments(tour.len());
        let start_weight = tour.weight;
        let mut passes = 0;

        loop {
            let mut improved = false;
            for &(i, j) in &segments {
                if let Some(weight) = self.improve(tour, i, j) {
                    log::trace!("2-opt ({}, {}) -> {:.4}", i, j, weight);
                    improved = true;
                }
            }
            passes += 1;
            if !improved {
                break;
            }
        }

        // Drop accumulated rounding from the running weight
        tour.recompute_weight(self.cache);
        log::debug!(
            "2-opt converged after {} passes: {:.4} -> {:.4}",
            passes,
            start_weight,
            tour.weight
        );
        start_weight - tour.weight
    }

    /// Simulated annealing with random 2-opt moves. Returns the final weight.
    pub fn run_simulated_annealing<R: Rng + ?Sized>(
        &self,
        tour: &mut Tour,
        params: &AnnealingParams,
        rng: &mut R,
    ) -> f64
    where
        K: Sync + Send,
        V: Sync + Send,
    {
        anneal(self, tour, params, rng);
        tour.recompute_weight(self.cache)
    }
}

impl<'a, K: Send + Sync, V: Send + Sync> AnnealingMove for TwoOpt<'a, K, V> {
    fn min_len(&self) -> usize {
        4
    }

    /// Samples `i` and `j` from `0..n - 1` at least two apart, so the move
    /// never touches the closing edge.
    fn random_move<R: Rng + ?Sized>(
        &self,
        tour: &mut Tour,
        temperature: f64,
        rng: &mut R,
    ) -> Option<f64> {
        let n = tour.len();
        let (i, j) = loop {
            let i = rng.gen_range(0..n - 1);
            let j = rng.gen_range(0..n - 1);
            if i.abs_diff(j) >= 2 {
                break (i.min(j), i.max(j));
            }
        };

        let delta = self.delta(&tour.order, i, j);
        if metropolis_accept(tour.weight, tour.weight + delta, temperature, rng) {
            Self::apply(&mut tour.order, i, j);
            tour.weight += delta;
            Some(tour.weight)
        } else {
            None
        }
    }
}
