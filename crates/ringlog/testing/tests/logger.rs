use ringlog_core::{EventId, LogLevel, RingBufferConfig, RingBufferLog, RingBufferLogger};
use ringlog_local::InMemoryKeyValueStore;
use ringlog_testing::{FaultyKeyValueStore, RecordingDiagnosticSink, StoreOp};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[error("payment declined")]
struct Declined(#[source] std::io::Error);

fn logger(capacity: usize) -> RingBufferLogger<InMemoryKeyValueStore> {
    let config = RingBufferConfig::new()
        .with_key_prefix("test")
        .with_capacity(capacity);
    RingBufferLogger::from_config(Arc::new(InMemoryKeyValueStore::new()), &config).unwrap()
}

#[tokio::test]
async fn test_log_writes_formatted_entry() {
    let logger = logger(3);

    logger
        .log(LogLevel::Information, 1, "msg", None, |s, _| s.to_string())
        .await;

    let entries = logger.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "msg");
    assert_eq!(entries[0].level, LogLevel::Information);
    assert_eq!(entries[0].event_id, EventId(1));
    assert_eq!(entries[0].exception, None);
}

#[tokio::test]
async fn test_log_records_error_chain() {
    let logger = logger(3);
    let error = Declined(std::io::Error::new(std::io::ErrorKind::Other, "card expired"));

    logger
        .log(LogLevel::Error, 42, 1999_u32, Some(&error), |cents, err| {
            format!(
                "charge of {} cents failed: {}",
                cents,
                err.map(|e| e.to_string()).unwrap_or_default()
            )
        })
        .await;

    let entries = logger.entries().await;
    assert_eq!(entries[0].message, "charge of 1999 cents failed: payment declined");
    assert_eq!(
        entries[0].exception.as_deref(),
        Some("payment declined\ncaused by: card expired")
    );
}

#[tokio::test]
async fn test_disabled_level_skips_formatter() {
    let logger = logger(3).with_min_level(LogLevel::Warning);
    assert!(!logger.is_enabled(LogLevel::Information));
    assert!(logger.is_enabled(LogLevel::Critical));

    logger
        .log(LogLevel::Debug, 1, (), None, |_, _| -> String {
            panic!("formatter must not run for disabled levels")
        })
        .await;
    logger.log_message(LogLevel::Information, 2, "ignored").await;
    logger.log_message(LogLevel::Warning, 3, "kept").await;

    let entries = logger.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "kept");
}

#[tokio::test]
async fn test_min_level_from_config() {
    let config = RingBufferConfig::new()
        .with_key_prefix("test")
        .with_capacity(3)
        .with_min_level(LogLevel::Error);
    let logger =
        RingBufferLogger::from_config(Arc::new(InMemoryKeyValueStore::new()), &config).unwrap();

    assert!(!logger.is_enabled(LogLevel::Warning));
    assert_eq!(logger.buffer().capacity(), 3);
    assert_eq!(logger.buffer().key_prefix(), "test");
}

#[tokio::test]
async fn test_logging_survives_store_outage() {
    let store = Arc::new(FaultyKeyValueStore::new(InMemoryKeyValueStore::new()));
    let sink = RecordingDiagnosticSink::new();
    let buffer = RingBufferLog::builder()
        .store(store.clone())
        .key_prefix("test")
        .capacity(3)
        .diagnostics(Arc::new(sink.clone()))
        .build()
        .unwrap();
    let logger = RingBufferLogger::new(Arc::new(buffer));

    store.fail(StoreOp::Increment);
    logger.log_message(LogLevel::Critical, 1, "dropped").await;
    store.heal();
    logger.log_message(LogLevel::Critical, 2, "kept").await;

    assert_eq!(sink.len(), 1);
    let entries = logger.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "kept");
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
    let config = RingBufferConfig::new().with_capacity(0);
    let result = RingBufferLogger::from_config(Arc::new(InMemoryKeyValueStore::new()), &config);
    assert!(result.unwrap_err().is_config());
}

#[tokio::test]
#[should_panic(expected = "formatter exploded")]
async fn test_formatter_panic_propagates() {
    let logger = logger(3);
    logger
        .log(LogLevel::Error, 1, (), None, |_, _| -> String {
            panic!("formatter exploded")
        })
        .await;
}
