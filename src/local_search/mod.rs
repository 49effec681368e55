//! Local search over a single tour: 2-opt, reduced 3-opt and simulated
//! annealing.
//!
//! Move deltas are computed from the distance cache alone and applied by
//! reversing or splicing contiguous ranges of the tour order.

pub mod annealing;
pub mod three_opt;
pub mod two_opt;

pub use self::annealing::{anneal, metropolis_accept, MAX_EQUILIBRIUM_COUNT};
pub use self::three_opt::ThreeOpt;
pub use self::two_opt::TwoOpt;

use crate::tour::Tour;
use rand::Rng;

/// A delta must be below `-IMPROVEMENT_EPSILON` to count as an improvement.
/// Keeps exhaustive drivers from cycling on rounding noise.
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// A neighbourhood that can drive simulated annealing.
pub trait AnnealingMove: Sync {
    /// Shortest tour the neighbourhood can propose moves on.
    fn min_len(&self) -> usize;

    /// Draw one random move and apply it if the Metropolis criterion at
    /// `temperature` accepts it.
    ///
    /// Returns the new tour weight for an applied move and `None` otherwise.
    fn random_move<R: Rng + ?Sized>(
        &self,
        tour: &mut Tour,
        temperature: f64,
        rng: &mut R,
    ) -> Option<f64>;
}
