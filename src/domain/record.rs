//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了写入缓存的扁平化城市记录。

use super::Continent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 缓存记录
///
/// 一个城市对应一条记录，键为城市ID。JSON 字段名为 camelCase。
/// 城市人口与国家人口是两个独立字段。十进制字段以 JSON 数值写出，保留原始精度。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    pub id: i32,
    pub name: String,
    pub district: String,
    /// 城市人口
    pub population: i32,
    pub country_code: String,
    pub alternative_country_code: String,
    pub country_name: String,
    pub continent: Continent,
    pub country_region: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub country_surface_area: Decimal,
    pub country_population: i32,
    pub languages: BTreeSet<Language>,
}

/// 缓存记录中的语言条目
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Language {
    pub language: String,
    pub official: bool,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub percentage: Decimal,
}
