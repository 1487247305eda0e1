//! Ring buffer scenarios over the SQLite backend.

use ringlog_core::{LogEntry, LogLevel, RingBufferLog};
use ringlog_sqlite::SqliteKeyValueStore;
use std::path::PathBuf;
use std::sync::Arc;

fn entry(message: &str) -> LogEntry {
    LogEntry::new(LogLevel::Warning, 7, message)
}

fn messages(entries: &[LogEntry]) -> Vec<String> {
    entries.iter().map(|e| e.message.clone()).collect()
}

struct TempDb(PathBuf);

impl TempDb {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("ringlog-{}.db", uuid::Uuid::new_v4())))
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[tokio::test]
async fn test_capacity_three_scenario() {
    let store = Arc::new(SqliteKeyValueStore::in_memory().await.unwrap());
    let log = RingBufferLog::new(store, "sqlite", 3).unwrap();

    for m in ["A", "B", "C"] {
        log.append(&entry(m)).await;
    }
    assert_eq!(messages(&log.read_all().await), vec!["A", "B", "C"]);

    log.append(&entry("D")).await;
    assert_eq!(messages(&log.read_all().await), vec!["B", "C", "D"]);
    assert_eq!(log.count().await.unwrap(), 3);

    log.clear().await.unwrap();
    assert!(log.read_all().await.is_empty());
    assert_eq!(log.count().await.unwrap(), 0);
    assert_eq!(log.position().await.unwrap(), -1);

    assert_eq!(log.try_append(&entry("E")).await.unwrap(), 0);
    assert_eq!(messages(&log.read_all().await), vec!["E"]);
}

#[tokio::test]
async fn test_entries_survive_reopening_the_database() {
    let db = TempDb::new();

    {
        let store = Arc::new(SqliteKeyValueStore::new(&db.0).await.unwrap());
        let log = RingBufferLog::new(store, "persisted", 2).unwrap();
        for m in ["A", "B", "C"] {
            log.append(&entry(m)).await;
        }
    }

    let store = Arc::new(SqliteKeyValueStore::new(&db.0).await.unwrap());
    let log = RingBufferLog::new(store, "persisted", 2).unwrap();
    assert_eq!(messages(&log.read_all().await), vec!["B", "C"]);
}

#[tokio::test]
async fn test_two_handles_share_one_database() {
    let db = TempDb::new();
    let first = RingBufferLog::new(
        Arc::new(SqliteKeyValueStore::new(&db.0).await.unwrap()),
        "shared",
        4,
    )
    .unwrap();
    let second = RingBufferLog::new(
        Arc::new(SqliteKeyValueStore::new(&db.0).await.unwrap()),
        "shared",
        4,
    )
    .unwrap();

    first.append(&entry("from first")).await;
    second.append(&entry("from second")).await;
    first.append(&entry("first again")).await;

    let expected = vec!["from first", "from second", "first again"];
    assert_eq!(messages(&first.read_all().await), expected);
    assert_eq!(messages(&second.read_all().await), expected);

    second.clear().await.unwrap();
    assert!(first.read_all().await.is_empty());
}
