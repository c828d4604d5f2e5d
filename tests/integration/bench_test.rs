//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 点查延迟对比集成测试

#[path = "../common/mod.rs"]
mod common;

use citycache::bench::{time_cache_lookups, time_source_lookups};
use citycache::denormalize::flatten_all;
use citycache::source::fetch_all;
use citycache::{CacheWriter, SourceStore, TransferError};
use common::{setup_logging, sqlite_source, CountingSource, MemoryConnector};
use std::sync::Arc;

const IDS: [i32; 10] = [3, 25, 12, 4, 18, 9, 30, 11, 10, 1];

async fn populated(count: usize) -> (CountingSource, MemoryConnector) {
    let source = sqlite_source(count).await;
    let session = source.begin_read().await.unwrap();
    let cities = fetch_all(session.as_ref(), 8).await.unwrap();
    session.close().await.unwrap();

    let connector = MemoryConnector::new();
    CacheWriter::new(connector.store())
        .put_all(&flatten_all(&cities))
        .await
        .unwrap();

    (CountingSource::new(Arc::new(source)), connector)
}

#[tokio::test]
async fn test_each_id_is_looked_up_once_per_path() {
    setup_logging();
    let (source, connector) = populated(30).await;
    let gets_before = connector.state.gets();

    let writer = CacheWriter::new(connector.store());
    let cache = time_cache_lookups(&writer, &IDS).await.unwrap();
    let db = time_source_lookups(&source, &IDS).await.unwrap();

    assert_eq!(cache.lookups, IDS.len());
    assert_eq!(connector.state.gets() - gets_before, IDS.len());
    assert!(cache.decode_failures.is_empty());

    assert_eq!(db.lookups, IDS.len());
    assert_eq!(source.fetches(), IDS.len());
    assert_eq!(source.open_sessions(), 0);

    // 耗时为 Duration，只要求可读出毫秒值
    let _ = cache.elapsed_ms();
    let _ = db.elapsed_ms();
}

#[tokio::test]
async fn test_corrupt_cache_value_is_counted_not_fatal() {
    setup_logging();
    let (_, connector) = populated(30).await;
    connector.state.insert_raw("12", "not json at all");

    let writer = CacheWriter::new(connector.store());
    let timing = time_cache_lookups(&writer, &IDS).await.unwrap();

    assert_eq!(timing.lookups, IDS.len());
    assert_eq!(timing.decode_failures.len(), 1);
    assert_eq!(timing.decode_failures[0].0, 12);
}

#[tokio::test]
async fn test_missing_cache_key_aborts_cache_timing() {
    setup_logging();
    let (_, connector) = populated(5).await;

    let writer = CacheWriter::new(connector.store());
    let err = time_cache_lookups(&writer, &[1, 2, 404]).await.unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_missing_source_row_aborts_source_timing() {
    setup_logging();
    let (source, _) = populated(5).await;

    let err = time_source_lookups(&source, &[1, 404]).await.unwrap_err();

    assert!(matches!(err, TransferError::NotFound(_)));
    // 出错时会话被丢弃并回滚
    assert_eq!(source.open_sessions(), 0);
}

#[tokio::test]
async fn test_empty_id_list_times_nothing() {
    setup_logging();
    let (source, connector) = populated(3).await;

    let writer = CacheWriter::new(connector.store());
    let cache = time_cache_lookups(&writer, &[]).await.unwrap();
    let db = time_source_lookups(&source, &[]).await.unwrap();

    assert_eq!(cache.lookups, 0);
    assert_eq!(db.lookups, 0);
    assert_eq!(source.fetches(), 0);
}
