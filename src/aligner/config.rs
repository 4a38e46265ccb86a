/// How much the search reports through `tracing` while it runs
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Only the search span is created
    #[default]
    Quiet,

    /// Emit a single summary event when the search finishes
    Summary,

    /// Additionally emit an event for every queued and visited node
    Nodes,
}

/// Per-search configuration
#[derive(Clone, Debug, Default)]
pub struct SearchConfig {
    pub verbosity: Verbosity,

    /// Name recorded on the search span, e.g., the name of the aligned sequences
    pub label: Option<String>,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    pub fn log_summary(&self) -> bool {
        self.verbosity >= Verbosity::Summary
    }

    #[inline]
    pub fn log_nodes(&self) -> bool {
        self.verbosity >= Verbosity::Nodes
    }
}


#[cfg(test)]
mod tests {
    use super::{SearchConfig, Verbosity};

    #[test]
    fn test_verbosity_levels() {
        let config = SearchConfig::new();
        assert!(!config.log_summary());
        assert!(!config.log_nodes());
        assert_eq!(config.label, None);

        let config = SearchConfig::new()
            .with_verbosity(Verbosity::Summary)
            .with_label("seq1");
        assert!(config.log_summary());
        assert!(!config.log_nodes());
        assert_eq!(config.label.as_deref(), Some("seq1"));

        let config = config.with_verbosity(Verbosity::Nodes);
        assert!(config.log_summary());
        assert!(config.log_nodes());
    }
}
