use std::{path::Path, time::Duration};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    registry::Registry,
};

const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);

fn default_report_interval() -> Duration {
    DEFAULT_REPORT_INTERVAL
}

/// Exporter settings and metric declarations, usually loaded from TOML:
///
/// ```toml
/// report_interval = "15s"
/// self_metrics = true
///
/// [[metric]]
/// name = "http_requests"
/// kind = "counter"
/// help = "Requests served"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How often a [`crate::Collector`] calls [`Registry::report`].
    #[serde(default = "default_report_interval", with = "humantime_serde")]
    pub report_interval: Duration,
    /// Whether the collector records its own stats into the registry.
    #[serde(default)]
    pub self_metrics: bool,
    #[serde(default, rename = "metric")]
    pub metrics: Vec<Declaration>,
}

/// A metric to [`Registry::declare`] at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub help: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_interval: DEFAULT_REPORT_INTERVAL,
            self_metrics: false,
            metrics: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_interval.is_zero() {
            return Err(Error::Invalid("report_interval must be non-zero".into()));
        }
        if let Some(i) = self.metrics.iter().position(|d| d.name.is_empty()) {
            return Err(Error::Invalid(format!("metric #{i} has an empty name")));
        }
        Ok(())
    }

    /// Declare every configured metric, in order, so a name declared twice
    /// ends up with its last declaration.
    pub fn apply(&self, registry: &Registry) {
        for d in &self.metrics {
            registry.declare(&d.name, &d.kind, &d.help);
        }
        tracing::debug!(message = "applied config", metrics = self.metrics.len());
    }
}
