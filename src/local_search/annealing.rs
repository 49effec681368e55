//! Temperature schedule and acceptance criterion shared by the annealing drivers.

use super::{AnnealingMove, IMPROVEMENT_EPSILON};
use crate::config::AnnealingParams;
use crate::tour::Tour;
use rand::Rng;

/// Upper bound on the number of moves tried per temperature.
pub const MAX_EQUILIBRIUM_COUNT: usize = 5000;

/// Metropolis criterion: always accept a lighter candidate, accept a heavier
/// one with probability `exp((current - candidate) / temperature)`.
pub fn metropolis_accept<R: Rng + ?Sized>(
    current: f64,
    candidate: f64,
    temperature: f64,
    rng: &mut R,
) -> bool {
    if candidate < current {
        return true;
    }
    ((current - candidate) / temperature).exp() > rng.gen::<f64>()
}

/// Anneal `tour` in place with the given neighbourhood.
///
/// Every temperature step tries `equilibrium` random moves, then cools the
/// temperature by `1 - cooling_rate` and grows `equilibrium` by
/// `equilibrium_increase` while it is below [`MAX_EQUILIBRIUM_COUNT`]. Stops
/// when the temperature reaches zero or after `max_iterations` steps.
///
/// On return `tour` holds the lightest tour seen, and its weight is returned.
/// Tours shorter than the neighbourhood's minimum are left untouched.
pub fn anneal<M, R>(
    neighbourhood: &M,
    tour: &mut Tour,
    params: &AnnealingParams,
    rng: &mut R,
) -> f64
where
    M: AnnealingMove,
    R: Rng + ?Sized,
{
    if tour.len() < neighbourhood.min_len() {
        return tour.weight;
    }

    let start_weight = tour.weight;
    let mut best = tour.clone();
    let mut temperature = params.initial_temperature;
    let mut equilibrium = params.equilibrium_count;
    let mut accepted: u64 = 0;
    let mut iteration = 0;

    while temperature > 0.0 && iteration < params.max_iterations {
        for _ in 0..equilibrium {
            if neighbourhood.random_move(tour, temperature, rng).is_some() {
                accepted += 1;
                if tour.weight < best.weight - IMPROVEMENT_EPSILON {
                    best.clone_from(tour);
                }
            }
        }

        temperature *= 1.0 - params.cooling_rate;
        if equilibrium < MAX_EQUILIBRIUM_COUNT {
            equilibrium += params.equilibrium_increase;
        }
        iteration += 1;

        if iteration % 1000 == 0 {
            log::debug!(
                "annealing step {}: temperature {:.6}, current {:.4}, best {:.4}",
                iteration,
                temperature,
                tour.weight,
                best.weight
            );
        }
    }

    log::debug!(
        "annealing finished after {} steps, {} accepted moves: {:.4} -> {:.4}",
        iteration,
        accepted,
        start_weight,
        best.weight
    );

    *tour = best;
    tour.weight
}
