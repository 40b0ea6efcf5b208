//! An in-process stats store rendering the Prometheus text exposition format.
//!
//! Callers record values as they happen, keyed by a metric name and an
//! optional tag set, and a scrape handler (or a [`Collector`]) periodically
//! pulls a text snapshot with [`Registry::report`]:
//!
//! ```
//! use promstats::{Registry, COUNTER};
//!
//! let stats = Registry::new();
//! stats.declare("http_requests", COUNTER, "Requests served");
//! stats.count("http_requests", [("method", "GET")], ());
//! stats.max("queue_depth", 12, ());
//!
//! assert_eq!(
//!     stats.report(),
//!     "# TYPE http_requests counter\n# HELP http_requests Requests served\n\
//!      http_requests{method=GET} 1\n\nqueue_depth 12\n",
//! );
//! ```
//!
//! Each stat aggregates with whichever of `set`, `count`, `min`, `max` or
//! `avg` updates it. Reporting starts a new window: stats of metrics declared
//! as `counter` keep their value, everything else is zeroed and stays silent
//! until it is updated again.

mod collector;
mod config;
mod error;
mod fmt;
mod metrics;
mod registry;
mod tags;
mod utils;

pub use collector::{Collector, Sink};
pub use config::{Config, Declaration};
pub use error::{Error, Result};
pub use fmt::{format_value, Number};
pub use metrics::{
    Accumulator, Aggregation, MetricDefinition, TagsOrValue, Value, COUNTER, GAUGE,
};
pub use registry::{Registry, DEFAULT_REGISTRY};
pub use tags::{resolve_identity, TagPairs, Tags};
