//! # Christofides TSP
//!
//! Approximate solutions to the metric Traveling Salesman Problem over a
//! complete weighted graph.
//!
//! A starting tour is built with the Christofides heuristic: minimum spanning
//! tree by Prim's algorithm, greedy matching of the odd-degree vertices with a
//! pairwise-exchange improvement pass, an Eulerian circuit over the combined
//! multigraph and shortcutting into a Hamiltonian cycle. The tour is then
//! refined by 2-opt, reduced 3-opt, simulated annealing or independent
//! annealing runs on a bounded thread pool.
//!
//! ```no_run
//! use christofides_tsp::config::{Config, OptimizationStrategy};
//! use christofides_tsp::geo::{geo_node, node_distance_km};
//! use christofides_tsp::TspSolver;
//!
//! let nodes = vec![
//!     geo_node(52.5200, 13.4050, "berlin"),
//!     geo_node(48.8566, 2.3522, "paris"),
//!     geo_node(51.5074, -0.1278, "london"),
//!     geo_node(41.9028, 12.4964, "rome"),
//! ];
//! let config = Config::new().with_strategy(OptimizationStrategy::TwoOpt);
//! let solver = TspSolver::from_nodes(nodes, node_distance_km, config)?;
//! let solution = solver.solve()?;
//! println!("{}", solution);
//! # Ok::<(), christofides_tsp::TspError>(())
//! ```

pub mod christofides;
pub mod config;
pub mod distance;
pub mod error;
pub mod geo;
pub mod graph;
pub mod local_search;
pub mod parallel;
pub mod solution;
pub mod solver;
pub mod tour;
pub mod utils;

pub use crate::config::{AnnealingParams, Config, Neighbourhood, OptimizationStrategy};
pub use crate::distance::DistanceCache;
pub use crate::error::{Result, TspError};
pub use crate::graph::{Edge, EdgeCreator, Graph, Node, NodeKey, NodeRef, PlainEdgeCreator};
pub use crate::solution::Solution;
pub use crate::solver::TspSolver;
pub use crate::tour::Tour;
