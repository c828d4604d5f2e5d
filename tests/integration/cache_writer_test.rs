//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 缓存写入器集成测试

#[path = "../common/mod.rs"]
mod common;

use citycache::denormalize::flatten_all;
use citycache::serialization::Serializer;
use citycache::source::fetch_all;
use citycache::{CacheWriter, Result, SourceStore, TransferError};
use common::{setup_logging, sqlite_source, MemoryConnector};
use serde::{de::DeserializeOwned, Serialize};

/// 对指定城市ID编码失败的序列化器
struct RejectingSerializer {
    reject_id: i64,
}

impl Serializer for RejectingSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        let json =
            serde_json::to_value(value).map_err(|e| TransferError::Encode(e.to_string()))?;
        if json.get("id").and_then(|id| id.as_i64()) == Some(self.reject_id) {
            return Err(TransferError::Encode(format!(
                "record {} rejected",
                self.reject_id
            )));
        }
        serde_json::to_string(&json).map_err(|e| TransferError::Encode(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        serde_json::from_str(data).map_err(|e| TransferError::Decode(e.to_string()))
    }
}

async fn records(count: usize) -> Vec<(i32, citycache::CacheRecord)> {
    let source = sqlite_source(count).await;
    let session = source.begin_read().await.unwrap();
    let cities = fetch_all(session.as_ref(), 5).await.unwrap();
    session.close().await.unwrap();
    flatten_all(&cities)
}

#[tokio::test]
async fn test_put_all_writes_one_key_per_city() {
    setup_logging();
    let batch = records(12).await;
    let connector = MemoryConnector::new();

    let writer = CacheWriter::new(connector.store());
    let report = writer.put_all(&batch).await.unwrap();

    assert_eq!(report.written, 12);
    assert_eq!(report.skipped_count(), 0);
    assert_eq!(connector.state.len(), 12);
    for id in 1..=12 {
        assert!(connector.state.raw(&id.to_string()).is_some(), "key {}", id);
    }
}

#[tokio::test]
async fn test_written_record_reads_back_equal() {
    setup_logging();
    let batch = records(3).await;
    let connector = MemoryConnector::new();
    let writer = CacheWriter::new(connector.store());
    writer.put_all(&batch).await.unwrap();

    for (id, expected) in &batch {
        let cached = writer.get(*id).await.unwrap();
        assert_eq!(&cached, expected);
    }

    let kabul = writer.get(1).await.unwrap();
    assert_eq!(kabul.country_name, "Afghanistan");
    assert_eq!(kabul.languages.len(), 2);
}

#[tokio::test]
async fn test_stored_value_uses_camel_case_fields() {
    setup_logging();
    let batch = records(1).await;
    let connector = MemoryConnector::new();
    let writer = CacheWriter::new(connector.store());
    writer.put_all(&batch).await.unwrap();

    let raw = connector.state.raw("1").unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["countryCode"], "AFG");
    assert_eq!(json["alternativeCountryCode"], "AF");
    assert_eq!(json["continent"], "ASIA");
    assert_eq!(json["countryPopulation"], 22_720_000);
    assert_eq!(json["population"], 1_780_000);
    assert!(json["countrySurfaceArea"].is_number());
    let languages = json["languages"].as_array().unwrap();
    assert_eq!(languages.len(), 2);
    for language in languages {
        assert!(language["percentage"].is_number(), "{}", language);
    }
}

#[tokio::test]
async fn test_encode_failure_skips_only_that_record() {
    setup_logging();
    let batch = records(5).await;
    let connector = MemoryConnector::new();

    let serializer = RejectingSerializer { reject_id: 3 };
    let writer = CacheWriter::with_serializer(connector.store(), serializer);
    let report = writer.put_all(&batch).await.unwrap();

    assert_eq!(report.written, 4);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, 3);
    assert!(connector.state.raw("3").is_none());
    assert!(connector.state.raw("4").is_some());
}

#[tokio::test]
async fn test_rewrite_overwrites_existing_key() {
    setup_logging();
    let batch = records(2).await;
    let connector = MemoryConnector::new();
    connector.state.insert_raw("1", "stale");

    let writer = CacheWriter::new(connector.store());
    writer.put_all(&batch).await.unwrap();

    assert_ne!(connector.state.raw("1").unwrap(), "stale");
    assert_eq!(connector.state.len(), 2);
}

#[tokio::test]
async fn test_missing_and_corrupt_keys() {
    setup_logging();
    let connector = MemoryConnector::new();
    connector.state.insert_raw("7", "{\"id\":7");

    let writer = CacheWriter::new(connector.store());

    let missing = writer.get(999_999).await.unwrap_err();
    assert!(missing.is_not_found(), "unexpected error: {:?}", missing);

    let corrupt = writer.get(7).await.unwrap_err();
    assert!(matches!(corrupt, TransferError::Decode(_)));
}

#[tokio::test]
async fn test_prefixed_keys() {
    setup_logging();
    let batch = records(2).await;
    let connector = MemoryConnector::new();

    let writer = CacheWriter::new(connector.store()).with_key_prefix("city:");
    writer.put_all(&batch).await.unwrap();

    assert!(connector.state.raw("city:1").is_some());
    assert!(connector.state.raw("1").is_none());
    assert_eq!(writer.get(2).await.unwrap().id, 2);
}
