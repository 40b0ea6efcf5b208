use std::time::Duration;

use promstats::{Collector, Config, DEFAULT_REGISTRY};

const CONFIG: &str = r#"
report_interval = "500ms"
self_metrics = true

[[metric]]
name = "demo_ticks"
kind = "counter"
help = "Ticks since start"

[[metric]]
name = "demo_latency_ms"
kind = "gauge"
help = "Mean tick latency"
"#;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::from_toml_str(CONFIG)?;
    let collector = Collector::from_config(&DEFAULT_REGISTRY, &config, |exposition: &str| {
        println!("{exposition}");
    });
    tokio::spawn(collector.run());

    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    for i in 0..30u32 {
        let start = std::time::Instant::now();
        ticker.tick().await;
        DEFAULT_REGISTRY.count("demo_ticks", (), ());
        DEFAULT_REGISTRY.count("demo_ticks", [("parity", i % 2)], ());
        DEFAULT_REGISTRY.avg("demo_latency_ms", start.elapsed().as_secs_f64() * 1000.0, ());
    }
    Ok(())
}
