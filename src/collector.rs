use std::time::{Duration, Instant};

use crate::{
    config::Config,
    metrics::GAUGE,
    registry::Registry,
};

pub(crate) mod metrics {
    pub const REGISTERED_STATS: &str = "promstats_registry_stats";
    pub const REPORT_DURATION_MS: &str = "promstats_report_duration_ms";
}

/// Somewhere to hand each rendered report, e.g. a node-exporter textfile or a
/// push gateway client.
pub trait Sink: Send {
    fn publish(&mut self, exposition: &str);
}

impl<F> Sink for F
where
    F: FnMut(&str) + Send,
{
    fn publish(&mut self, exposition: &str) {
        self(exposition)
    }
}

/// The collector drives [`Registry::report`] on a fixed interval for
/// processes that push their stats rather than being scraped. Each report
/// closes a report window, so a registry should be driven either by a
/// collector or by a scrape handler, not both.
pub struct Collector<S> {
    registry: &'static Registry,
    interval: Duration,
    sink: S,
    self_metrics: bool,
}

impl<S: Sink> Collector<S> {
    pub fn new(registry: &'static Registry, interval: Duration, sink: S) -> Self {
        Self {
            registry,
            interval,
            sink,
            self_metrics: false,
        }
    }

    /// Build a collector from `config`, declaring its metrics on `registry`.
    pub fn from_config(registry: &'static Registry, config: &Config, sink: S) -> Self {
        config.apply(registry);
        Self::new(registry, config.report_interval, sink).with_self_metrics(config.self_metrics)
    }

    /// Record the registry size and report latency into the registry itself.
    /// They show up in the report after the one they measure.
    pub fn with_self_metrics(mut self, enabled: bool) -> Self {
        if enabled && !self.self_metrics {
            // Gauge rather than counter: both are re-measured every window.
            self.registry.declare(
                metrics::REGISTERED_STATS,
                GAUGE,
                "Stats held by the registry at the last report",
            );
            self.registry.declare(
                metrics::REPORT_DURATION_MS,
                GAUGE,
                "Slowest report in milliseconds",
            );
        }
        self.self_metrics = enabled;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Render one report and hand it to the sink.
    pub fn collect(&mut self) {
        let collection_start = Instant::now();
        let exposition = self.registry.report();
        let collection_dur = collection_start.elapsed();
        tracing::debug!(message="collected stats", duration=?collection_dur, bytes=exposition.len());

        if self.self_metrics {
            self.registry
                .set(metrics::REGISTERED_STATS, self.registry.len(), ());
            self.registry.max(
                metrics::REPORT_DURATION_MS,
                collection_dur.as_secs_f64() * 1000.0,
                (),
            );
        }
        self.sink.publish(&exposition);
    }

    /// Collect forever, once per interval. The first collection happens
    /// immediately.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn leaked() -> &'static Registry {
        Box::leak(Box::new(Registry::new()))
    }

    fn recording_sink() -> (Arc<Mutex<Vec<String>>>, impl Sink) {
        let published = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let published = published.clone();
            move |exposition: &str| published.lock().unwrap().push(exposition.to_string())
        };
        (published, sink)
    }

    #[test]
    fn test_collect() {
        let reg = leaked();
        let (published, sink) = recording_sink();
        let mut collector = Collector::new(reg, Duration::from_secs(1), sink);

        reg.set("x", 1, ());
        collector.collect();
        collector.collect();
        assert_eq!(*published.lock().unwrap(), vec!["x 1\n".to_string(), String::new()]);
    }

    #[test]
    fn test_self_metrics() {
        let reg = leaked();
        let (published, sink) = recording_sink();
        let mut collector = Collector::new(reg, Duration::from_secs(1), sink).with_self_metrics(true);

        reg.count("x", (), ());
        collector.collect();
        collector.collect();

        let published = published.lock().unwrap();
        assert_eq!(published[0], "x 1\n");
        assert!(published[1].contains("# TYPE promstats_registry_stats gauge\n"));
        assert!(published[1].contains("promstats_registry_stats 1\n"));
        assert!(published[1].contains("# HELP promstats_report_duration_ms Slowest report in milliseconds\n"));
    }

    #[test]
    fn test_from_config() {
        let reg = leaked();
        let config = Config::from_toml_str(
            r#"
            report_interval = "250ms"
            [[metric]]
            name = "jobs"
            kind = "counter"
            "#,
        )
        .unwrap();
        let (published, sink) = recording_sink();
        let mut collector = Collector::from_config(reg, &config, sink);
        assert_eq!(collector.interval(), Duration::from_millis(250));

        reg.count("jobs", (), ());
        collector.collect();
        reg.count("jobs", (), ());
        collector.collect();
        assert_eq!(
            *published.lock().unwrap(),
            vec![
                "# TYPE jobs counter\njobs 1\n".to_string(),
                "# TYPE jobs counter\njobs 2\n".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_run() {
        let reg = leaked();
        reg.set("x", 1, ());
        let (published, sink) = recording_sink();
        let collector = Collector::new(reg, Duration::from_millis(10), sink);

        let res = tokio::time::timeout(Duration::from_millis(100), collector.run()).await;
        assert!(res.is_err(), "run never returns");

        let published = published.lock().unwrap();
        assert!(!published.is_empty());
        assert_eq!(published[0], "x 1\n");
    }
}
