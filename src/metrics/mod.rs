pub(crate) mod accumulator;
pub(crate) mod value;

pub use accumulator::Accumulator;
pub use value::{TagsOrValue, Value};

/// The kind that keeps its value across reports. Every other kind, including
/// none at all, is zeroed after each report.
pub const COUNTER: &str = "counter";
pub const GAUGE: &str = "gauge";

/// How an accumulator folds a new observation into its running value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Aggregation {
    /// Last value wins.
    Set,
    /// Running sum.
    Count,
    Min,
    Max,
    /// Running arithmetic mean.
    Avg,
}

/// The declared metadata of a metric, keyed by its base name in the registry.
///
/// Both fields are free-form and empty means unset: an empty kind or help
/// suppresses the matching `# TYPE` / `# HELP` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricDefinition {
    pub kind: String,
    pub help: String,
}

impl MetricDefinition {
    pub fn new(kind: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            help: help.into(),
        }
    }

    /// Counters persist across reports.
    pub fn is_counter(&self) -> bool {
        self.kind == COUNTER
    }
}
