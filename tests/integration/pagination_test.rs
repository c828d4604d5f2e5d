//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 分页全量读取集成测试

#[path = "../common/mod.rs"]
mod common;

use citycache::source::fetch_all;
use citycache::{Continent, SourceStore, TransferError};
use common::{setup_logging, sqlite_source};
use sea_orm::ConnectionTrait;
use std::collections::HashSet;

const CITIES: usize = 23;

#[tokio::test]
async fn test_count_total_matches_seeded_rows() {
    setup_logging();
    let source = sqlite_source(CITIES).await;

    let session = source.begin_read().await.unwrap();
    assert_eq!(session.count_total().await.unwrap(), CITIES as u64);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_every_page_size_reads_each_city_once() {
    setup_logging();
    let source = sqlite_source(CITIES).await;

    for page_size in [1u64, 7, CITIES as u64, 500] {
        let session = source.begin_read().await.unwrap();
        let cities = fetch_all(session.as_ref(), page_size).await.unwrap();
        session.close().await.unwrap();

        assert_eq!(cities.len(), CITIES, "page size {}", page_size);
        let ids: Vec<i32> = cities.iter().map(|c| c.id).collect();
        let expected: Vec<i32> = (1..=CITIES as i32).collect();
        assert_eq!(ids, expected, "page size {}", page_size);

        let unique: HashSet<i32> = ids.into_iter().collect();
        assert_eq!(unique.len(), CITIES);
    }
}

#[tokio::test]
async fn test_zero_page_size_is_rejected() {
    setup_logging();
    let source = sqlite_source(3).await;

    let session = source.begin_read().await.unwrap();
    let err = fetch_all(session.as_ref(), 0).await.unwrap_err();
    session.close().await.unwrap();

    assert!(matches!(err, TransferError::Configuration(_)));
}

#[tokio::test]
async fn test_empty_table_reads_nothing() {
    setup_logging();
    let source = sqlite_source(0).await;

    let session = source.begin_read().await.unwrap();
    assert_eq!(session.count_total().await.unwrap(), 0);
    let cities = fetch_all(session.as_ref(), 10).await.unwrap();
    session.close().await.unwrap();

    assert!(cities.is_empty());
}

#[tokio::test]
async fn test_pages_carry_country_and_languages() {
    setup_logging();
    let source = sqlite_source(CITIES).await;

    let session = source.begin_read().await.unwrap();
    let cities = fetch_all(session.as_ref(), 4).await.unwrap();
    session.close().await.unwrap();

    let kabul = &cities[0];
    assert_eq!(kabul.name, "Kabul");
    assert_eq!(kabul.country.code, "AFG");
    assert_eq!(kabul.country.continent, Continent::Asia);
    assert_eq!(kabul.country.languages.len(), 2);

    // 2号城市属于没有语言的 ATA
    let antarctic = &cities[1];
    assert_eq!(antarctic.country.code, "ATA");
    assert_eq!(antarctic.country.continent, Continent::Antarctica);
    assert!(antarctic.country.languages.is_empty());

    assert_eq!(cities[2].country.code, "AFG");
    assert_eq!(cities[3].country.code, "NLD");
    assert_eq!(cities[3].country.languages.len(), 2);
}

#[tokio::test]
async fn test_fetch_by_id() {
    setup_logging();
    let source = sqlite_source(CITIES).await;

    let session = source.begin_read().await.unwrap();
    let kabul = session.fetch_by_id(1).await.unwrap();
    assert_eq!(kabul.id, 1);
    assert_eq!(kabul.district, "Kabol");
    assert_eq!(kabul.population, 1_780_000);
    assert_eq!(kabul.country.name, "Afghanistan");
    assert_eq!(kabul.country.population, 22_720_000);

    let languages: HashSet<&str> = kabul
        .country
        .languages
        .iter()
        .map(|l| l.language.as_str())
        .collect();
    assert_eq!(languages, HashSet::from(["Pashto", "Dari"]));

    let err = session.fetch_by_id(999_999).await.unwrap_err();
    session.close().await.unwrap();

    assert!(err.is_not_found(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_unknown_continent_ordinal_fails_the_read() {
    setup_logging();
    let source = sqlite_source(4).await;
    source
        .connection()
        .execute_unprepared("UPDATE country SET continent = 9 WHERE id = 1")
        .await
        .unwrap();

    let session = source.begin_read().await.unwrap();
    let err = fetch_all(session.as_ref(), 2).await.unwrap_err();
    session.close().await.unwrap();

    assert!(matches!(err, TransferError::SourceUnavailable(_)), "{:?}", err);
    assert!(!err.is_recoverable());
}
