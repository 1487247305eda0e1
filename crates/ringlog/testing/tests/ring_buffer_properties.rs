use ringlog_core::diagnostics::Operation;
use ringlog_core::{LogEntry, LogLevel, RingBufferError, RingBufferLog};
use ringlog_local::InMemoryKeyValueStore;
use ringlog_testing::{FaultyKeyValueStore, RecordingDiagnosticSink, StoreOp};
use std::sync::Arc;

const PREFIX: &str = "test";

fn entry(message: impl Into<String>) -> LogEntry {
    LogEntry::new(LogLevel::Information, 1, message)
}

fn messages(entries: &[LogEntry]) -> Vec<String> {
    entries.iter().map(|e| e.message.clone()).collect()
}

fn unique_prefix() -> String {
    format!("{}:{}", PREFIX, uuid::Uuid::new_v4())
}

fn buffer(capacity: usize) -> RingBufferLog<InMemoryKeyValueStore> {
    RingBufferLog::new(Arc::new(InMemoryKeyValueStore::new()), PREFIX, capacity).unwrap()
}

fn faulty_buffer(
    capacity: usize,
) -> (
    Arc<FaultyKeyValueStore<InMemoryKeyValueStore>>,
    RecordingDiagnosticSink,
    RingBufferLog<FaultyKeyValueStore<InMemoryKeyValueStore>>,
) {
    let store = Arc::new(FaultyKeyValueStore::new(InMemoryKeyValueStore::new()));
    let sink = RecordingDiagnosticSink::new();
    let log = RingBufferLog::builder()
        .store(store.clone())
        .key_prefix(PREFIX)
        .capacity(capacity)
        .diagnostics(Arc::new(sink.clone()))
        .build()
        .unwrap();
    (store, sink, log)
}

#[tokio::test]
async fn test_reads_back_in_append_order_below_capacity() {
    for appended in 0..=5 {
        let log = buffer(5);
        let expected: Vec<String> = (0..appended).map(|i| format!("msg-{}", i)).collect();
        for m in &expected {
            log.append(&entry(m.clone())).await;
        }

        assert_eq!(messages(&log.read_all().await), expected, "after {} appends", appended);
        assert_eq!(log.count().await.unwrap(), appended);
    }
}

#[tokio::test]
async fn test_oldest_entry_is_overwritten() {
    let log = buffer(4);
    for i in 0..5 {
        log.append(&entry(format!("msg-{}", i))).await;
    }

    assert_eq!(
        messages(&log.read_all().await),
        vec!["msg-1", "msg-2", "msg-3", "msg-4"]
    );
    assert_eq!(log.count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_many_wraparounds_keep_order() {
    let log = buffer(3);
    for i in 0..100usize {
        log.append(&entry(format!("msg-{}", i))).await;

        let expected: Vec<String> = (i.saturating_sub(2)..=i).map(|j| format!("msg-{}", j)).collect();
        assert_eq!(messages(&log.read_all().await), expected);
        assert!(log.count().await.unwrap() <= 3);
    }
}

#[tokio::test]
async fn test_capacity_three_scenario() {
    let log = buffer(3);
    for m in ["A", "B", "C"] {
        log.append(&entry(m)).await;
    }
    assert_eq!(messages(&log.read_all().await), vec!["A", "B", "C"]);

    log.append(&entry("D")).await;
    assert_eq!(messages(&log.read_all().await), vec!["B", "C", "D"]);

    log.clear().await.unwrap();
    assert!(log.read_all().await.is_empty());
    assert_eq!(log.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let log = RingBufferLog::new(store.clone(), PREFIX, 3).unwrap();
    for m in ["A", "B"] {
        log.append(&entry(m)).await;
    }

    log.clear().await.unwrap();
    let once = store.snapshot().await;
    log.clear().await.unwrap();
    let twice = store.snapshot().await;

    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);
    assert_eq!(once.get("test:position").map(String::as_str), Some("-1"));
    assert!(log.read_all().await.is_empty());
    assert_eq!(log.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_clear_then_append_starts_at_slot_zero() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let log = RingBufferLog::new(store.clone(), PREFIX, 3).unwrap();
    log.clear().await.unwrap();

    assert_eq!(log.try_append(&entry("first")).await.unwrap(), 0);
    let snapshot = store.snapshot().await;
    assert!(snapshot.contains_key("test:entry:0"));
    assert_eq!(snapshot.get("test:position").map(String::as_str), Some("0"));
}

#[tokio::test]
async fn test_clear_deletes_every_slot_and_resets_position() {
    let (store, _sink, log) = faulty_buffer(3);
    log.clear().await.unwrap();

    assert_eq!(
        store.keys_for(StoreOp::Delete),
        vec!["test:entry:0", "test:entry:1", "test:entry:2"]
    );
    let sets = store.calls();
    let reset = sets.iter().find(|c| c.op == StoreOp::Set).unwrap();
    assert_eq!(reset.key, "test:position");
    assert_eq!(reset.value.as_deref(), Some("-1"));
}

#[tokio::test]
async fn test_read_walks_from_just_past_position() {
    let (store, _sink, log) = faulty_buffer(3);
    for m in ["A", "B", "C", "D"] {
        log.append(&entry(m)).await;
    }
    store.clear_calls();

    log.read_all().await;

    assert_eq!(
        store.keys_for(StoreOp::Get),
        vec!["test:position", "test:entry:2", "test:entry:0", "test:entry:1"]
    );
}

#[tokio::test]
async fn test_fresh_store_ordering_uses_store_increment() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let log = RingBufferLog::new(store.clone(), PREFIX, 3).unwrap();

    // An absent counter increments from 0, so the first write is sequence 1.
    assert_eq!(log.try_append(&entry("A")).await.unwrap(), 1);
    assert_eq!(log.try_append(&entry("B")).await.unwrap(), 2);
    assert_eq!(log.try_append(&entry("C")).await.unwrap(), 3);
    assert_eq!(log.position().await.unwrap(), 3);
    assert_eq!(messages(&log.read_all().await), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_append_is_fail_open_with_one_notice() {
    let (store, sink, log) = faulty_buffer(3);
    store.fail_all();

    log.append(&entry("lost")).await;

    assert_eq!(sink.len(), 1);
    let notice = &sink.notices()[0];
    assert_eq!(notice.operation, Operation::Append);
    assert_eq!(notice.key_prefix, PREFIX);
    assert!(notice.error.contains("injected increment failure"));
}

#[tokio::test]
async fn test_failed_slot_write_consumes_sequence_number() {
    let (store, sink, log) = faulty_buffer(3);
    log.append(&entry("A")).await;

    store.fail(StoreOp::Set);
    log.append(&entry("lost")).await;
    store.heal();
    log.append(&entry("C")).await;

    assert_eq!(sink.count_for(Operation::Append), 1);
    assert_eq!(log.position().await.unwrap(), 3);
    assert_eq!(messages(&log.read_all().await), vec!["A", "C"]);
}

#[tokio::test]
async fn test_rejected_write_is_reported() {
    let (store, sink, log) = faulty_buffer(3);
    store.reject_writes(true);

    log.append(&entry("A")).await;
    assert_eq!(sink.count_for(Operation::Append), 1);
    assert!(matches!(
        log.try_append(&entry("B")).await,
        Err(RingBufferError::Rejected { .. })
    ));
    assert!(matches!(log.clear().await, Err(RingBufferError::Rejected { .. })));
}

#[tokio::test]
async fn test_read_failure_returns_empty_and_reports_once() {
    let (store, sink, log) = faulty_buffer(3);
    for m in ["A", "B", "C"] {
        log.append(&entry(m)).await;
    }

    store.fail(StoreOp::Get);
    assert!(log.read_all().await.is_empty());
    assert_eq!(sink.count_for(Operation::ReadAll), 1);

    store.heal();
    assert_eq!(messages(&log.read_all().await), vec!["A", "B", "C"]);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_clear_and_count_surface_store_errors() {
    let (store, sink, log) = faulty_buffer(3);

    store.fail(StoreOp::Delete);
    assert!(matches!(
        log.clear().await,
        Err(RingBufferError::Storage { operation: "delete", .. })
    ));

    store.fail(StoreOp::Exists);
    assert!(matches!(
        log.count().await,
        Err(RingBufferError::Storage { operation: "exists", .. })
    ));

    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_buffers_with_different_prefixes_are_independent() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let orders = RingBufferLog::new(store.clone(), unique_prefix(), 2).unwrap();
    let billing = RingBufferLog::new(store.clone(), unique_prefix(), 2).unwrap();

    orders.append(&entry("order placed")).await;
    billing.append(&entry("invoice sent")).await;
    billing.clear().await.unwrap();

    assert_eq!(messages(&orders.read_all().await), vec!["order placed"]);
    assert!(billing.read_all().await.is_empty());
}

#[tokio::test]
async fn test_entry_fields_survive_storage() {
    let log = buffer(2);
    let original = LogEntry::new(LogLevel::Critical, -17, "")
        .with_exception("panic in worker\ncaused by: poisoned lock")
        .with_timestamp(chrono::DateTime::from_timestamp(1_714_557_600, 123_456_789).unwrap());

    log.append(&original).await;

    assert_eq!(log.read_all().await, vec![original]);
}
