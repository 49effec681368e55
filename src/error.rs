//! Error types for the TSP pipeline.

use thiserror::Error;

/// Everything that can abort construction or refinement of a tour.
#[derive(Debug, Error)]
pub enum TspError {
    /// The distance cache has no entry for an ordered node pair.
    #[error("no cached distance between {from} and {to}; the input graph must be complete")]
    MissingDistance { from: String, to: String },

    /// A node handed to the distance cache was never registered with it.
    #[error("node {0} is not registered in the distance cache")]
    UnknownNode(String),

    /// Prim's algorithm ran out of reachable nodes before spanning the graph.
    #[error("graph is disconnected: reached {reached} of {total} nodes")]
    Disconnected { reached: usize, total: usize },

    /// The matching step received an odd number of odd-degree nodes.
    #[error("cannot pair an odd number ({0}) of odd-degree nodes")]
    OddMatchingInput(usize),

    #[error("need at least {required} nodes, got {actual}")]
    TooFewNodes { required: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TspError>;

impl TspError {
    pub fn missing_distance(from: impl ToString, to: impl ToString) -> Self {
        Self::MissingDistance {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
