//! Walk engine configuration.

use hopwalk_graph::{ParallelEdges, PruneMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{WalkError, WalkResult};

/// Upper bound applied to every request's per-hop result limit.
pub const DEFAULT_RESULTS_LIMIT_CAP: usize = 1_000_000;

/// Configuration for [`GetWalksHandler`](crate::GetWalksHandler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Hard ceiling on edges retained per hop, whatever the request asks for
    pub results_limit_cap: usize,
    /// Drop adjacency entries that cannot be part of a complete walk
    pub prune: PruneMode,
    /// How parallel edges between one vertex pair become walk steps
    pub parallel_edges: ParallelEdges,
    /// Assemble walks for different seeds on the rayon pool
    pub parallel_assembly: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            results_limit_cap: DEFAULT_RESULTS_LIMIT_CAP,
            prune: PruneMode::Enabled,
            parallel_edges: ParallelEdges::Separate,
            parallel_assembly: false,
        }
    }
}

impl WalkConfig {
    pub fn from_json_str(json: &str) -> WalkResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> WalkResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> WalkResult<()> {
        if self.results_limit_cap == 0 {
            return Err(WalkError::InvalidConfig(
                "results_limit_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The limit actually enforced for a request asking for `requested`.
    pub fn effective_limit(&self, requested: usize) -> usize {
        requested.min(self.results_limit_cap)
    }
}
