use crate::{EngineConfig, Rgx};

/// A builder for creating a matching façade with custom limits.
#[derive(Debug, Clone, Default)]
pub struct RgxBuilder {
    config: EngineConfig,
}

impl RgxBuilder {
    /// Creates a new builder carrying the default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Sets the maximum pattern length in code points.
    pub fn max_pattern_length(mut self, length: usize) -> Self {
        self.config.max_pattern_length = length;
        self
    }

    /// Sets the maximum input length in code points.
    pub fn max_input_length(mut self, length: usize) -> Self {
        self.config.max_input_length = length;
        self
    }

    /// Sets the backtrack budget of the backtracking matcher.
    pub fn max_backtracks(mut self, limit: u64) -> Self {
        self.config.max_backtracks = limit;
        self
    }

    /// Sets the per-operation wall-clock budget in milliseconds.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Enables or disables the compiled-pattern cache.
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    /// Sets the bounded entry count of the compiled-pattern cache.
    pub fn cache_max_size(mut self, size: usize) -> Self {
        self.config.cache_max_size = size;
        self
    }

    /// Builds the façade.
    pub fn build(self) -> Rgx {
        Rgx::with_config(self.config)
    }
}
