//! Approximate perfect matching over the odd-degree vertices of a spanning tree.
//!
//! Nodes are paired greedily with their nearest unpaired successor, then a
//! bounded number of pairwise-exchange sweeps try to re-pair edge couples more
//! cheaply. Not a minimum-weight perfect matching.

use crate::distance::DistanceCache;
use crate::error::{Result, TspError};
use crate::graph::{Edge, EdgeCreator, NodeKey, NodeRef};
use itertools::Itertools;

/// Pair every node in `odd` with exactly one other.
///
/// Walks the nodes left to right; each unpaired node is matched with the
/// closest unpaired node after it. Ties keep the earliest candidate.
pub fn greedy_matching<K: NodeKey, V>(
    odd: &[NodeRef<K, V>],
    cache: &DistanceCache<K, V>,
    creator: &dyn EdgeCreator<K, V>,
) -> Result<Vec<Edge<K, V>>> {
    if odd.len() % 2 != 0 {
        return Err(TspError::OddMatchingInput(odd.len()));
    }

    let mut paired = vec![false; odd.len()];
    let mut matching = Vec::with_capacity(odd.len() / 2);

    for i in 0..odd.len() {
        if paired[i] {
            continue;
        }

        let mut closest: Option<(usize, f64)> = None;
        for j in (i + 1)..odd.len() {
            if paired[j] {
                continue;
            }
            let distance = cache.get(odd[i].key(), odd[j].key())?;
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((j, distance));
            }
        }

        // An even count guarantees a partner for every unpaired node
        let (j, distance) = closest.ok_or(TspError::OddMatchingInput(odd.len()))?;
        paired[i] = true;
        paired[j] = true;
        matching.push(creator.create_edge(&odd[i], &odd[j], distance));
    }

    log::debug!(
        "greedy matching paired {} odd nodes, weight {:.4}",
        odd.len(),
        matching_weight(&matching)
    );
    Ok(matching)
}

/// Run `iterations` pairwise-exchange sweeps over the matching.
///
/// For every pair of matching edges A-B and C-D, the cheaper of A-C + B-D and
/// A-D + B-C replaces them if it is strictly lighter. Every sweep runs even if
/// the previous one found nothing. Returns the improvement gained per sweep.
pub fn improve_matching<K: NodeKey, V>(
    matching: &mut [Edge<K, V>],
    cache: &DistanceCache<K, V>,
    creator: &dyn EdgeCreator<K, V>,
    iterations: usize,
) -> Result<Vec<f64>> {
    let mut gains = Vec::with_capacity(iterations);

    for sweep in 0..iterations {
        let mut gain = 0.0;

        for (i, j) in (0..matching.len()).tuple_combinations() {
            let (a, b) = (matching[i].first().clone(), matching[i].second().clone());
            let (c, d) = (matching[j].first().clone(), matching[j].second().clone());
            let current = matching[i].weight() + matching[j].weight();

            let ac = cache.get(a.key(), c.key())?;
            let bd = cache.get(b.key(), d.key())?;
            let ad = cache.get(a.key(), d.key())?;
            let bc = cache.get(b.key(), c.key())?;

            let (first, second) = if ac + bd < ad + bc {
                ((&c, ac), (&d, bd))
            } else {
                ((&d, ad), (&c, bc))
            };
            let alternative = first.1 + second.1;

            if alternative < current {
                matching[i] = creator.create_edge(&a, first.0, first.1);
                matching[j] = creator.create_edge(&b, second.0, second.1);
                gain += current - alternative;
            }
        }

        log::debug!("matching sweep {}: improved by {:.4}", sweep + 1, gain);
        gains.push(gain);
    }

    Ok(gains)
}

/// Total weight of a set of matching edges.
pub fn matching_weight<K, V>(matching: &[Edge<K, V>]) -> f64 {
    matching.iter().map(Edge::weight).sum()
}
