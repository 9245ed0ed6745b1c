//! Configuration management for the community engine

use crate::cluster::ConductancePolicy;
use crate::data::{GraphFormat, IndexBase};

/// Default configuration for a run
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether vertex ids in the input start at 0 or 1
    pub index_base: IndexBase,

    /// Input format; `None` guesses from the file extension
    pub format: Option<GraphFormat>,

    /// Aggregation used for the headline conductance
    pub conductance_policy: ConductancePolicy,

    /// Output directory for results
    pub output_dir: String,

    /// Number of worker threads (0 = use all available cores)
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_base: IndexBase::One,
            format: None,
            conductance_policy: ConductancePolicy::WorstCase,
            output_dir: "community_results".to_string(),
            threads: 0,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        index_base: IndexBase,
        format: Option<GraphFormat>,
        conductance_policy: ConductancePolicy,
        output_dir: String,
        threads: usize,
    ) -> Self {
        Self {
            index_base,
            format,
            conductance_policy,
            output_dir,
            threads,
        }
    }

    /// Worker threads to use, resolving 0 to the number of cores
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            num_cpus::get()
        }
    }
}
