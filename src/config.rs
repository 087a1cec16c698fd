use serde::{Deserialize, Serialize};

/// Runtime limits and cache settings for a matching engine.
///
/// All lengths are measured in code points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Patterns longer than this are rejected with an `InvalidArgument` error.
    pub max_pattern_length: usize,
    /// Inputs longer than this are rejected with an `InvalidArgument` error.
    pub max_input_length: usize,
    /// The backtracking matcher aborts with `BacktrackLimitExceeded` beyond
    /// this number of backtracks.
    pub max_backtracks: u64,
    /// Per-operation wall-clock budget in milliseconds.
    pub timeout_ms: u64,
    /// If false, every compile call reparses the pattern.
    pub cache_enabled: bool,
    /// Bounded entry count of the compiled-pattern cache. The oldest entry
    /// by insertion order is evicted when an insertion would exceed it.
    pub cache_max_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_pattern_length: 10_000,
            max_input_length: 1_000_000,
            max_backtracks: 100_000,
            timeout_ms: 30_000,
            cache_enabled: true,
            cache_max_size: 1_000,
        }
    }
}
