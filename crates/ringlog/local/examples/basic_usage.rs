//! Record a handful of entries into a small in-memory ring buffer and print
//! what it retains.
//!
//! Run with: cargo run -p ringlog-local --example basic_usage

use ringlog_core::telemetry::{init_telemetry, TelemetryConfig};
use ringlog_core::{
    LogLevel, RingBufferConfig, RingBufferLog, RingBufferLogger, TracingDiagnosticSink,
};
use ringlog_local::InMemoryKeyValueStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = init_telemetry(&TelemetryConfig::default());

    let config = RingBufferConfig::from_env()?.with_capacity(3);
    config.validate()?;

    let store = Arc::new(InMemoryKeyValueStore::new());
    let buffer = RingBufferLog::builder()
        .store(store.clone())
        .key_prefix(config.key_prefix.clone())
        .capacity(config.capacity)
        .diagnostics(Arc::new(TracingDiagnosticSink::new()))
        .build()?;
    let logger = RingBufferLogger::new(Arc::new(buffer)).with_min_level(config.min_level);

    for (i, step) in ["connect", "authenticate", "sync", "disconnect"].iter().enumerate() {
        logger
            .log(LogLevel::Information, i as i32, step, None, |step, _| {
                format!("step {} finished", step)
            })
            .await;
    }

    let failure = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
    logger
        .log(LogLevel::Error, 99, (), Some(&failure), |_, err| {
            format!("sync aborted: {}", err.map(|e| e.to_string()).unwrap_or_default())
        })
        .await;

    for entry in logger.entries().await {
        println!(
            "{} [{}] ({}) {}{}",
            entry.timestamp.to_rfc3339(),
            entry.level,
            entry.event_id,
            entry.message,
            entry
                .exception
                .map(|e| format!(" | {}", e.replace('\n', " | ")))
                .unwrap_or_default()
        );
    }

    tracing::info!(
        retained = logger.buffer().count().await?,
        keys = store.len().await,
        "Done"
    );
    Ok(())
}
