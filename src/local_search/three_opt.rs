//! Reduced 3-opt neighbourhood.
//!
//! A triple `(a, b, c)` cuts the tour into `[a, b)`, `[b, c)` and the rest.
//! With `A = t[a-1]`, `B = t[a]`, `C = t[b-1]`, `D = t[b]`, `E = t[c-1]` and
//! `F = t[c mod n]` the removed edges weigh `d0 = AB + CD + EF`. Two of the
//! seven reconnections are considered:
//!
//! * segment exchange, `d3 = AD + EB + CF`: `[b, c)` moves in front of `[a, b)`
//! * reverse-rotate, `d4 = DB + CF + EA`: the tour becomes
//!   `[a, b) ++ [c, n) ++ [0, a) ++ reversed [b, c)`

use super::annealing::{anneal, metropolis_accept};
use super::{AnnealingMove, IMPROVEMENT_EPSILON};
use crate::config::AnnealingParams;
use crate::distance::DistanceCache;
use crate::error::Result;
use crate::graph::NodeKey;
use crate::tour::Tour;
use rand::Rng;

/// Upper bound on the number of triples kept in memory for sampling. Longer
/// tours sample triples by rejection instead.
pub const MAX_PRECOMPUTED_SEGMENTS: usize = 2_000_000;

/// Shortest tour with at least one valid triple.
const MIN_TOUR_LEN: usize = 5;

/// Weights around one triple: removed edges and both reconnections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripleCost {
    pub removed: f64,
    pub segment_exchange: f64,
    pub reverse_rotate: f64,
}

/// Reduced 3-opt moves evaluated against a shared distance cache.
#[derive(Debug, Clone)]
pub struct ThreeOpt<'a, K, V> {
    cache: &'a DistanceCache<K, V>,
    /// Tour length the triples below were enumerated for
    segments_len: usize,
    segments: Option<Vec<(usize, usize, usize)>>,
}

impl<'a, K: NodeKey, V> ThreeOpt<'a, K, V> {
    /// Create a new 3-opt neighbourhood for tours over every cached node.
    ///
    /// Triples are enumerated once here when there are few enough of them.
    /// Fails with `MissingDistance` on an incomplete cache.
    pub fn new(cache: &'a DistanceCache<K, V>) -> Result<Self> {
        cache.ensure_complete()?;
        let n = cache.len();
        let segments = (Self::segment_count(n) <= MAX_PRECOMPUTED_SEGMENTS)
            .then(|| Self::all_segments(n));
        Ok(ThreeOpt {
            cache,
            segments_len: n,
            segments,
        })
    }
}

impl<'a, K, V> ThreeOpt<'a, K, V> {

    /// Every triple `(a, b, c)` with `1 <= a`, `a + 2 <= b`, `b + 2 <= c <= n`.
    pub fn all_segments(n: usize) -> Vec<(usize, usize, usize)> {
        let mut segments = Vec::with_capacity(Self::segment_count(n));
        for a in 1..n {
            for b in (a + 2)..n {
                for c in (b + 2)..=n {
                    segments.push((a, b, c));
                }
            }
        }
        segments
    }

    /// Number of triples [`all_segments`](Self::all_segments) yields.
    pub fn segment_count(n: usize) -> usize {
        let mut count = 0;
        for a in 1..n {
            for b in (a + 2)..n {
                count += (n + 1).saturating_sub(b + 2);
            }
        }
        count
    }

    /// Weights of the removed edges and of both reconnections.
    #[inline]
    pub fn evaluate(&self, order: &[usize], a: usize, b: usize, c: usize) -> TripleCost {
        let n = order.len();
        let (ta, tb) = (order[a - 1], order[a]);
        let (tc, td) = (order[b - 1], order[b]);
        let (te, tf) = (order[c - 1], order[c % n]);
        let d = |x: usize, y: usize| self.cache.between(x, y);

        TripleCost {
            removed: d(ta, tb) + d(tc, td) + d(te, tf),
            segment_exchange: d(ta, td) + d(te, tb) + d(tc, tf),
            reverse_rotate: d(td, tb) + d(tc, tf) + d(te, ta),
        }
    }

    /// Move `[b, c)` in front of `[a, b)`.
    pub fn apply_segment_exchange(order: &mut [usize], a: usize, b: usize, c: usize) {
        order[a..c].rotate_left(b - a);
    }

    /// Rebuild the order as `[a, b) ++ [c, n) ++ [0, a) ++ reversed [b, c)`.
    pub fn apply_reverse_rotate(order: &mut Vec<usize>, a: usize, b: usize, c: usize) {
        let mut next = Vec::with_capacity(order.len());
        next.extend_from_slice(&order[a..b]);
        next.extend_from_slice(&order[c..]);
        next.extend_from_slice(&order[..a]);
        next.extend(order[b..c].iter().rev());
        *order = next;
    }

    /// Apply the cheaper reconnection of `(a, b, c)` if it strictly shortens
    /// the tour.
    ///
    /// Returns the new weight, or `None` when neither reconnection improves.
    pub fn improve(&self, tour: &mut Tour, a: usize, b: usize, c: usize) -> Option<f64> {
        let cost = self.evaluate(&tour.order, a, b, c);

        if cost.segment_exchange <= cost.reverse_rotate {
            if cost.segment_exchange < cost.removed - IMPROVEMENT_EPSILON {
                Self::apply_segment_exchange(&mut tour.order, a, b, c);
                tour.weight += cost.segment_exchange - cost.removed;
                return Some(tour.weight);
            }
        } else if cost.reverse_rotate < cost.removed - IMPROVEMENT_EPSILON {
            Self::apply_reverse_rotate(&mut tour.order, a, b, c);
            tour.weight += cost.reverse_rotate - cost.removed;
            return Some(tour.weight);
        }
        None
    }

    /// Exhaustive 3-opt: full passes over every triple, applying each
    /// improving move, until a pass changes nothing.
    ///
    /// Returns the total improvement. Tours shorter than five nodes are left
    /// unchanged.
    pub fn perform(&self, tour: &mut Tour) -> f64 {
        let n = tour.len();
        if n < MIN_TOUR_LEN {
            return 0.0;
        }

        let start_weight = tour.weight;
        let mut passes = 0;
        loop {
            let mut improved = false;
            // Enumerated lazily, the full triple list may be too large to hold
            for a in 1..n {
                for b in (a + 2)..n {
                    for c in (b + 2)..=n {
                        if let Some(weight) = self.improve(tour, a, b, c) {
                            log::trace!("3-opt ({}, {}, {}) -> {:.4}", a, b, c, weight);
                            improved = true;
                        }
                    }
                }
            }
            passes += 1;
            log::debug!("3-opt pass {}: weight {:.4}", passes, tour.weight);
            if !improved {
                break;
            }
        }

        tour.recompute_weight(self.cache);
        log::debug!(
            "3-opt converged after {} passes: {:.4} -> {:.4}",
            passes,
            start_weight,
            tour.weight
        );
        start_weight - tour.weight
    }

    /// Simulated annealing with random reduced 3-opt moves. Returns the final
    /// weight.
    pub fn run_simulated_annealing<R: Rng + ?Sized>(
        &self,
        tour: &mut Tour,
        params: &AnnealingParams,
        rng: &mut R,
    ) -> f64
    where
        K: Send + Sync,
        V: Send + Sync,
    {
        anneal(self, tour, params, rng);
        tour.recompute_weight(self.cache)
    }

    /// Uniformly random triple for a tour of length `n >= 5`.
    fn sample_segment<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> (usize, usize, usize) {
        if let Some(segments) = self.segments.as_ref().filter(|_| self.segments_len == n) {
            return segments[rng.gen_range(0..segments.len())];
        }

        loop {
            let a = rng.gen_range(1..n);
            let b = rng.gen_range(1..n);
            let c = rng.gen_range(1..=n);
            if a + 2 <= b && b + 2 <= c {
                return (a, b, c);
            }
        }
    }
}

impl<'a, K: Send + Sync, V: Send + Sync> AnnealingMove for ThreeOpt<'a, K, V> {
    fn min_len(&self) -> usize {
        MIN_TOUR_LEN
    }

    /// Applies the cheaper improving reconnection when there is one.
    /// Otherwise tries reverse-rotate, then segment exchange, against the
    /// Metropolis criterion.
    fn random_move<R: Rng + ?Sized>(
        &self,
        tour: &mut Tour,
        temperature: f64,
        rng: &mut R,
    ) -> Option<f64> {
        let (a, b, c) = self.sample_segment(tour.len(), rng);
        let cost = self.evaluate(&tour.order, a, b, c);
        let current = tour.weight;

        if cost.segment_exchange.min(cost.reverse_rotate) < cost.removed {
            if cost.segment_exchange <= cost.reverse_rotate {
                Self::apply_segment_exchange(&mut tour.order, a, b, c);
                tour.weight = current - cost.removed + cost.segment_exchange;
            } else {
                Self::apply_reverse_rotate(&mut tour.order, a, b, c);
                tour.weight = current - cost.removed + cost.reverse_rotate;
            }
            return Some(tour.weight);
        }

        let reverse_rotate = current - cost.removed + cost.reverse_rotate;
        if metropolis_accept(current, reverse_rotate, temperature, rng) {
            Self::apply_reverse_rotate(&mut tour.order, a, b, c);
            tour.weight = reverse_rotate;
            return Some(tour.weight);
        }

        let segment_exchange = current - cost.removed + cost.segment_exchange;
        if metropolis_accept(current, segment_exchange, temperature, rng) {
            Self::apply_segment_exchange(&mut tour.order, a, b, c);
            tour.weight = segment_exchange;
            return Some(tour.weight);
        }

        None
    }
}
