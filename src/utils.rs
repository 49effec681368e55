//! Utility functions and structures for reporting solver runs.

use std::time::Duration;

use log::LevelFilter;

/// Format a duration as hours, minutes, seconds and milliseconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!(
        "{}h {:02}m {:02}s {:03}ms",
        hours,
        minutes,
        seconds,
        duration.subsec_millis()
    )
}

/// Initialise `env_logger` at `level` unless `RUST_LOG` overrides it.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Figures collected over one solver run.
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    pub nodes: usize,
    pub mst_weight: f64,
    pub odd_nodes: usize,
    pub matching_weight: f64,
    /// Weight of the tour produced by Christofides, before refinement
    pub construction_weight: f64,
    pub final_weight: f64,
    pub construction_time: Duration,
    pub optimization_time: Duration,
}

impl RunStatistics {
    /// Ratio of the final tour weight to the spanning tree weight. The
    /// spanning tree is a lower bound on the optimal tour.
    pub fn mst_ratio(&self) -> f64 {
        if self.mst_weight > 0.0 {
            self.final_weight / self.mst_weight
        } else {
            f64::NAN
        }
    }

    /// Relative improvement of refinement over the constructed tour.
    pub fn improvement(&self) -> f64 {
        if self.construction_weight > 0.0 {
            1.0 - self.final_weight / self.construction_weight
        } else {
            0.0
        }
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Run Statistics:
- Nodes: {}
- MST Weight: {:.4}
- Odd-Degree Nodes: {}
- Matching Weight: {:.4}
- Christofides Tour Weight: {:.4}
- Final Tour Weight: {:.4}
- Tour / MST Ratio: {:.4}
- Improvement: {:.2}%
- Construction Time: {}
- Optimization Time: {}",
            self.nodes,
            self.mst_weight,
            self.odd_nodes,
            self.matching_weight,
            self.construction_weight,
            self.final_weight,
            self.mst_ratio(),
            self.improvement() * 100.0,
            format_duration(self.construction_time),
            format_duration(self.optimization_time)
        )
    }
}
