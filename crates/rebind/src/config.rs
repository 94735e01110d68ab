//! Runtime configuration.

/// When pending views are recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushMode {
    /// Flush after every dispatched event, mount and batch, once the
    /// handler body has returned.
    #[default]
    AfterEachEvent,
    /// Only flush when [`Runtime::flush`](crate::Runtime::flush) is called.
    Manual,
}

/// Configuration for a [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// When pending views are recomputed.
    pub flush_mode: FlushMode,
    /// Emit each rendered output at trace level.
    pub log_outputs: bool,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flush mode.
    pub fn with_flush_mode(mut self, flush_mode: FlushMode) -> Self {
        self.flush_mode = flush_mode;
        self
    }

    /// Enable or disable trace logging of rendered outputs.
    pub fn with_log_outputs(mut self, log_outputs: bool) -> Self {
        self.log_outputs = log_outputs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_flush_after_each_event() {
        let config = RuntimeConfig::default();
        assert_eq!(config.flush_mode, FlushMode::AfterEachEvent);
        assert!(!config.log_outputs);
    }

    #[test]
    fn builder_overrides() {
        let config = RuntimeConfig::new()
            .with_flush_mode(FlushMode::Manual)
            .with_log_outputs(true);
        assert_eq!(config.flush_mode, FlushMode::Manual);
        assert!(config.log_outputs);
    }
}
